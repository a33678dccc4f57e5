/// Framebuffer size in physical pixels.
///
/// Renderers derive their aspect ratio from this on every frame, so a resize
/// only needs to replace the value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `false` for a minimized window; nothing should be drawn then.
    #[inline]
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. A zero-height viewport reports `1.0`.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
