use crate::coords::Viewport;

/// What a lesson's draw closure needs besides the target: uploads go
/// through `queue`, sizing follows `viewport`.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            viewport,
        }
    }
}

/// Target for drawing (encoder + color view).
///
/// The color attachment has already been cleared for this frame; passes
/// should load it.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Color attachment that keeps the cleared contents.
    ///
    /// Borrows only the view, so it can be built before `encoder` is borrowed.
    pub fn color_attachment(&self) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}
