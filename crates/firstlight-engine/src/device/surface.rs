use winit::dpi::PhysicalSize;

/// What the frame loop does after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was configured again; the next frame can proceed.
    Reconfigured,
    /// Drop this frame only.
    SkipFrame,
    /// Out of memory. The runtime unloads the lesson and exits.
    Fatal,
}

impl From<&wgpu::SurfaceError> for SurfaceErrorAction {
    fn from(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

/// Picks a surface format from those the surface supports.
///
/// With `prefer_srgb` an sRGB 8-bit format wins; without it a linear 8-bit
/// format wins. Falls back to the first supported format.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let preferred: [wgpu::TextureFormat; 2] = if prefer_srgb {
        [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]
    } else {
        [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm]
    };

    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Applies a framebuffer resize to the surface configuration.
///
/// wgpu cannot configure a 0x0 surface; in that case only `size` is updated
/// and configuration is deferred until the window becomes visible again.
/// Returns `true` when the surface was reconfigured.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = SurfaceErrorAction::from(&err);
    if action == SurfaceErrorAction::Reconfigured && size.width > 0 && size.height > 0 {
        surface.configure(device, config);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Fmt};

    #[test]
    fn srgb_preferred_when_requested() {
        let formats = [Fmt::Bgra8Unorm, Fmt::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(Fmt::Bgra8UnormSrgb));
    }

    #[test]
    fn linear_preferred_when_srgb_off() {
        let formats = [Fmt::Bgra8UnormSrgb, Fmt::Rgba8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(Fmt::Rgba8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [Fmt::Rgba16Float, Fmt::Rgb10a2Unorm];
        assert_eq!(choose_surface_format(&formats, true), Some(Fmt::Rgba16Float));
        assert_eq!(choose_surface_format(&formats, false), Some(Fmt::Rgba16Float));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn alpha_mode_honors_supported_request() {
        let modes = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
    }

    #[test]
    fn alpha_mode_ignores_unsupported_request() {
        let modes = [Alpha::Opaque];
        assert_eq!(choose_alpha_mode(&modes, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&[], None), Alpha::Auto);
    }

    #[test]
    fn lost_and_outdated_surfaces_reconfigure() {
        use wgpu::SurfaceError;
        assert_eq!(SurfaceErrorAction::from(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(
            SurfaceErrorAction::from(&SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn only_out_of_memory_is_fatal() {
        use wgpu::SurfaceError;
        assert_eq!(SurfaceErrorAction::from(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
        assert_eq!(SurfaceErrorAction::from(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(SurfaceErrorAction::from(&SurfaceError::Other), SurfaceErrorAction::SkipFrame);
    }
}
