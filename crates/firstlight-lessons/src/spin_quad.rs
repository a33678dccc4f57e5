//! Lesson 3: a quad rotating about its center while its scale pulses.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use firstlight_engine::core::{App, AppControl, FrameCtx};
use firstlight_engine::device::Gpu;
use firstlight_engine::render::{build_program, GpuResources, Handle, ProgramDesc};
use firstlight_engine::time::FrameTime;

use crate::motion::Motion;
use crate::quad::{QuadBuffers, QuadVertex};
use crate::CLEAR_COLOR;

const VERTEX_SHADER: &str = include_str!("shaders/spin.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/spin.frag.wgsl");

/// Rotation speed in radians per second.
pub const ANGULAR_RATE: f32 = 1.0;

/// Uniform block consumed by both spin shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpinUniform {
    /// `(cos a, sin a)`.
    pub rotation: [f32; 2],
    pub center: [f32; 2],
    pub scale: f32,
    pub time: f32,
    pub aspect: f32,
    pub _pad: f32,
}

impl SpinUniform {
    /// Uniform values for the current frame state.
    pub fn at(motion: &Motion, center: [f32; 2], aspect: f32) -> Self {
        let (cos, sin) = motion.rotation(ANGULAR_RATE);
        Self {
            rotation: [cos, sin],
            center,
            scale: motion.pulse_scale(),
            time: motion.elapsed(),
            aspect,
            _pad: 0.0,
        }
    }
}

pub struct SpinQuadLesson {
    motion: Motion,
    center: [f32; 2],
    resources: GpuResources,
    quad: Option<QuadBuffers>,
    pipeline: Option<Handle<wgpu::RenderPipeline>>,
}

impl Default for SpinQuadLesson {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinQuadLesson {
    pub fn new() -> Self {
        Self {
            motion: Motion::new(),
            center: [0.0, 0.0],
            resources: GpuResources::new(),
            quad: None,
            pipeline: None,
        }
    }

    /// Moves the rotation center (clip-space units).
    pub fn with_center(mut self, center: [f32; 2]) -> Self {
        self.center = center;
        self
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }
}

impl App for SpinQuadLesson {
    fn on_load(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let device = gpu.device();
        let initial = SpinUniform::at(&self.motion, self.center, gpu.viewport().aspect());
        let quad = QuadBuffers::acquire(device, &mut self.resources, &initial);

        let program = self.resources.get(quad.bind_group_layout).map(|bgl| {
            build_program(
                device,
                &ProgramDesc {
                    label: "spin quad",
                    vertex_source: VERTEX_SHADER,
                    fragment_source: FRAGMENT_SHADER,
                    vertex_buffers: &[QuadVertex::layout()],
                    bind_group_layouts: &[bgl],
                    color_format: gpu.surface_format(),
                    depth_format: None,
                },
            )
        });
        self.pipeline = program.and_then(|p| {
            crate::install_program(&mut self.resources, "spin quad pipeline", p)
        });

        self.quad = Some(quad);
        Ok(())
    }

    fn on_update(&mut self, time: FrameTime) {
        self.motion.advance(time.dt);
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let uniform = SpinUniform::at(&self.motion, self.center, ctx.viewport().aspect());
        let resources = &self.resources;
        let (quad, pipeline) = (self.quad.as_ref(), self.pipeline);

        ctx.render(CLEAR_COLOR, |rctx, target| {
            let Some(quad) = quad else { return };
            if let Some(ubo) = resources.get(quad.ubo) {
                rctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
            }
            let Some(pipeline) = pipeline.and_then(|h| resources.get(h)) else {
                return;
            };

            let color = target.color_attachment();
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spin quad pass"),
                color_attachments: &[Some(color)],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            quad.draw(resources, pipeline, &mut rpass);
        })
    }

    fn on_unload(&mut self) {
        let n = self.resources.release_all();
        log::debug!("spin quad released {n} resources");
        self.pipeline = None;
        self.quad = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstlight_engine::render::{compile_stage, ShaderStage};

    fn tick(lesson: &mut SpinQuadLesson, dt: f32, frame_index: u64) {
        lesson.on_update(FrameTime {
            dt,
            now: std::time::Instant::now(),
            frame_index,
        });
    }

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<SpinUniform>(), 32);
    }

    #[test]
    fn initial_uniform_is_unrotated_at_base_scale() {
        let u = SpinUniform::at(&Motion::new(), [0.0, 0.0], 1.0);
        assert_eq!(u.rotation, [1.0, 0.0]);
        assert_eq!(u.scale, 0.5);
        assert_eq!(u.time, 0.0);
    }

    #[test]
    fn uniform_follows_elapsed_time() {
        let mut lesson = SpinQuadLesson::new().with_center([0.25, -0.25]);
        for i in 0..10 {
            tick(&mut lesson, 0.1, i);
        }

        let u = SpinUniform::at(lesson.motion(), [0.25, -0.25], 2.0);
        let t = lesson.motion().elapsed();
        assert!((t - 1.0).abs() < 1e-5);
        assert!((u.rotation[0] - t.cos()).abs() < 1e-5);
        assert!((u.rotation[1] - t.sin()).abs() < 1e-5);
        assert!((u.scale - 0.5 * (1.0 + 0.25 * t.sin())).abs() < 1e-6);
        assert_eq!(u.center, [0.25, -0.25]);
        assert_eq!(u.aspect, 2.0);
    }

    /// Clip-space position of a quad corner, as computed by spin.vert.wgsl.
    fn place(u: &SpinUniform, pos: [f32; 2]) -> [f32; 2] {
        let [c, s] = u.rotation;
        let p = [pos[0] * u.scale, pos[1] * u.scale];
        let r = [(p[0] * c - p[1] * s) / u.aspect, p[0] * s + p[1] * c];
        [r[0] + u.center[0], r[1] + u.center[1]]
    }

    #[test]
    fn center_stays_put_when_aspect_changes() {
        let motion = Motion::new();
        let square = SpinUniform::at(&motion, [0.5, 0.25], 1.0);
        let wide = SpinUniform::at(&motion, [0.5, 0.25], 2.0);

        assert_eq!(place(&square, [0.0, 0.0]), [0.5, 0.25]);
        assert_eq!(place(&wide, [0.0, 0.0]), [0.5, 0.25]);

        // Only the quad's own extent narrows.
        assert_eq!(place(&square, [0.5, 0.0]), [0.75, 0.25]);
        assert_eq!(place(&wide, [0.5, 0.0]), [0.625, 0.25]);
    }

    #[test]
    fn replaying_deltas_reproduces_uniforms() {
        let deltas = [0.016, 0.02, 0.1, 0.25, 0.0001];
        let run = || {
            let mut lesson = SpinQuadLesson::new();
            for (i, &dt) in deltas.iter().enumerate() {
                tick(&mut lesson, dt, i as u64);
            }
            SpinUniform::at(lesson.motion(), [0.0, 0.0], 1.0)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn shaders_compile() {
        let device = crate::test_device();
        for (stage, source) in [
            (ShaderStage::Vertex, VERTEX_SHADER),
            (ShaderStage::Fragment, FRAGMENT_SHADER),
        ] {
            let (_module, err) = compile_stage(&device, "spin quad", stage, source);
            assert!(err.is_none(), "{err:?}");
        }
    }
}
