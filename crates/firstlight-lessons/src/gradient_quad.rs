//! Lesson 2: a UV-mapped quad shaded with a time-varying gradient.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use firstlight_engine::core::{App, AppControl, FrameCtx};
use firstlight_engine::device::Gpu;
use firstlight_engine::render::{build_program, GpuResources, Handle, ProgramDesc};
use firstlight_engine::time::FrameTime;

use crate::motion::Motion;
use crate::quad::{QuadBuffers, QuadVertex};
use crate::CLEAR_COLOR;

const VERTEX_SHADER: &str = include_str!("shaders/gradient.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/gradient.frag.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GradientUniform {
    pub time: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

impl GradientUniform {
    pub fn at(motion: &Motion) -> Self {
        Self {
            time: motion.elapsed(),
            _pad: [0.0; 3],
        }
    }
}

#[derive(Default)]
pub struct GradientQuadLesson {
    motion: Motion,
    resources: GpuResources,
    quad: Option<QuadBuffers>,
    pipeline: Option<Handle<wgpu::RenderPipeline>>,
}

impl GradientQuadLesson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }
}

impl App for GradientQuadLesson {
    fn on_load(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let device = gpu.device();
        let quad = QuadBuffers::acquire(device, &mut self.resources, &GradientUniform::default());

        let program = self.resources.get(quad.bind_group_layout).map(|bgl| {
            build_program(
                device,
                &ProgramDesc {
                    label: "gradient quad",
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
            crate::install_program(&mut self.resources, "gradient quad pipeline", p)
        });

        self.quad = Some(quad);
        Ok(())
    }

    fn on_update(&mut self, time: FrameTime) {
        self.motion.advance(time.dt);
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let uniform = GradientUniform::at(&self.motion);
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
                label: Some("gradient quad pass"),
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
        log::debug!("gradient quad released {n} resources");
        self.pipeline = None;
        self.quad = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstlight_engine::render::{compile_stage, ShaderStage};

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GradientUniform>(), 16);
    }

    #[test]
    fn uniform_carries_elapsed_time() {
        let mut m = Motion::new();
        m.advance(1.5);
        assert_eq!(GradientUniform::at(&m).time, 1.5);
        assert_eq!(GradientUniform::at(&Motion::new()), GradientUniform::default());
    }

    #[test]
    fn update_accumulates_frame_deltas() {
        let mut lesson = GradientQuadLesson::new();
        let now = std::time::Instant::now();
        for i in 0..4 {
            lesson.on_update(FrameTime { dt: 0.25, now, frame_index: i });
        }
        assert_eq!(lesson.motion().elapsed(), 1.0);
    }

    #[test]
    fn unload_without_load_is_harmless() {
        let mut lesson = GradientQuadLesson::new();
        lesson.on_unload();
        lesson.on_unload();
        assert_eq!(lesson.resources.live(), 0);
    }

    #[test]
    fn shaders_compile() {
        let device = crate::test_device();
        for (stage, source) in [
            (ShaderStage::Vertex, VERTEX_SHADER),
            (ShaderStage::Fragment, FRAGMENT_SHADER),
        ] {
            let (_module, err) = compile_stage(&device, "gradient quad", stage, source);
            assert!(err.is_none(), "{err:?}");
        }
    }
}
