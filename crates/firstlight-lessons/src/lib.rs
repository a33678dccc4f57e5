//! Classroom rendering lessons.
//!
//! Each lesson is a self-contained [`App`](firstlight_engine::core::App):
//! - [`terrain`]: heightmap terrain under an orbiting camera
//! - [`gradient_quad`]: a UV-mapped quad shaded with an animated gradient
//! - [`spin_quad`]: a quad that rotates and pulses in scale

pub mod gradient_quad;
pub mod motion;
pub mod spin_quad;
pub mod terrain;

mod quad;

use firstlight_engine::coords::Color;
use firstlight_engine::render::{GpuResources, Handle, Program};

/// Background shared by all lessons.
pub const CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.15);

/// Moves a linked pipeline into `resources`, where it is released after
/// everything else. An unlinked program leaves the lesson without a
/// pipeline; it keeps clearing and presenting.
pub(crate) fn install_program(
    resources: &mut GpuResources,
    label: &'static str,
    program: Program,
) -> Option<Handle<wgpu::RenderPipeline>> {
    if !program.is_linked() {
        log::warn!(
            "{label}: {} shader error(s), drawing nothing",
            program.errors.len()
        );
    }
    program
        .pipeline
        .map(|pipeline| resources.acquire_program(label, pipeline))
}

/// Device on wgpu's no-op backend, for validating lesson shaders.
#[cfg(test)]
pub(crate) fn test_device() -> wgpu::Device {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = pollster::block_on(instance.request_adapter(&Default::default()))
        .expect("no-op adapter");
    let (device, _queue) = pollster::block_on(adapter.request_device(&Default::default()))
        .expect("no-op device");
    device
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstlight_engine::render::{build_program, ProgramDesc};

    fn program(fragment_source: &str) -> Program {
        build_program(
            &test_device(),
            &ProgramDesc {
                label: "install",
                vertex_source: "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0, 0.0, 0.0, 1.0); }",
                fragment_source,
                vertex_buffers: &[],
                bind_group_layouts: &[],
                color_format: wgpu::TextureFormat::Rgba8Unorm,
                depth_format: None,
            },
        )
    }

    #[test]
    fn linked_program_is_installed() {
        let mut resources = GpuResources::new();
        let fs = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let handle = install_program(&mut resources, "ok pipeline", program(fs));

        let handle = handle.expect("pipeline handle");
        assert!(resources.get(handle).is_some());
        assert_eq!(resources.live(), 1);
    }

    #[test]
    fn failed_program_leaves_lesson_without_pipeline() {
        let mut resources = GpuResources::new();
        let handle = install_program(&mut resources, "broken pipeline", program("fn fs_main( {"));

        assert!(handle.is_none());
        assert_eq!(resources.live(), 0);
    }
}
