/// Surface and device settings for [`Runtime::run`](crate::window::Runtime::run).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one exists. Off for lessons that write
    /// vertex colors as authored.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    /// Hint only; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Linear (non-sRGB) surface, vsynced.
    pub fn linear() -> Self {
        Self {
            prefer_srgb: false,
            ..Self::default()
        }
    }
}
