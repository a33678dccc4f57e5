use crate::coords::Viewport;

/// Depth format used by depth-tested lessons.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth attachment that follows the framebuffer size.
///
/// The texture is recreated lazily when the viewport changes and destroyed on
/// [`release`](Self::release) or drop.
#[derive(Default)]
pub struct DepthTarget {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    size: Viewport,
}

impl DepthTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure a depth texture matching `viewport` exists.
    pub fn ensure(&mut self, device: &wgpu::Device, viewport: Viewport) {
        if self.texture.is_some() && self.size == viewport {
            return;
        }
        self.release();
        if !viewport.is_drawable() {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("firstlight depth"),
            size: wgpu::Extent3d {
                width: viewport.width,
                height: viewport.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("depth target resized to {}x{}", viewport.width, viewport.height);
        self.texture = Some(texture);
        self.view = Some(view);
        self.size = viewport;
    }

    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    /// Depth attachment cleared to the far plane.
    pub fn attachment(&self) -> Option<wgpu::RenderPassDepthStencilAttachment<'_>> {
        self.view().map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        })
    }

    pub fn release(&mut self) {
        self.view = None;
        if let Some(texture) = self.texture.take() {
            texture.destroy();
        }
        self.size = Viewport::default();
    }
}

impl Drop for DepthTarget {
    fn drop(&mut self) {
        self.release();
    }
}
