//! GPU rendering helpers shared by lessons.
//!
//! Each lesson owns its pipelines and buffers; this module provides the
//! per-frame context, shader compilation with logged (non-fatal) failures,
//! a reverse-order resource stack, and a resizable depth target.

mod ctx;
mod depth;
mod program;
mod resources;
mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use depth::{DepthTarget, DEPTH_FORMAT};
pub use program::{build_program, Program, ProgramDesc};
pub use resources::{GpuResource, GpuResources, Handle, Release, Resource, ResourceStack};
pub use shader::{compile_stage, ShaderError, ShaderStage};

/// Device on wgpu's no-op backend: validates shaders and pipelines without
/// touching a GPU.
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
