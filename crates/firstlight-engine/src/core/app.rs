use anyhow::Result;

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::time::FrameTime;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Lifecycle hooks implemented by a render loop.
///
/// The runtime calls them in order: `on_load` once, then `on_update` followed
/// by `on_render` every tick, `on_resize` between ticks when the framebuffer
/// changes, and `on_unload` exactly once at the end (also on error exits).
pub trait App {
    /// Acquires GPU resources. An error here is fatal for the session.
    fn on_load(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Advances frame state by `time.dt`.
    fn on_update(&mut self, time: FrameTime) {
        let _ = time;
    }

    /// Draws and presents one frame.
    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called after the surface has been reconfigured for a new framebuffer size.
    fn on_resize(&mut self, gpu: &Gpu<'_>, viewport: Viewport) {
        let _ = (gpu, viewport);
    }

    /// Releases everything acquired in `on_load`. Also runs when `on_load`
    /// returned an error, so it must cope with a partial load.
    fn on_unload(&mut self) {}
}
