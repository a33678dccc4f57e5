//! Lesson 1: heightmap terrain under an orbiting camera.
//!
//! Geometry is rebuilt from the heightmap on every frame and streamed into a
//! vertex buffer, the wgpu counterpart of drawing it in immediate mode.

pub mod camera;
pub mod mesh;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use firstlight_engine::assets::Heightmap;
use firstlight_engine::coords::Viewport;
use firstlight_engine::core::{App, AppControl, FrameCtx};
use firstlight_engine::device::Gpu;
use firstlight_engine::render::{
    build_program, DepthTarget, GpuResources, Handle, ProgramDesc, DEPTH_FORMAT,
};
use firstlight_engine::time::FrameTime;

use crate::motion::Motion;
use crate::CLEAR_COLOR;

use mesh::{TerrainVertex, VERTEX_COUNT};

const VERTEX_SHADER: &str = include_str!("../shaders/terrain.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("../shaders/terrain.frag.wgsl");

/// Heightmap read when no path is given (the one shipped with this crate).
pub const DEFAULT_HEIGHTMAP: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/heightmap.png");

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

struct TerrainGpu {
    vbo: Handle<wgpu::Buffer>,
    ubo: Handle<wgpu::Buffer>,
    bind_group: Handle<wgpu::BindGroup>,
    pipeline: Option<Handle<wgpu::RenderPipeline>>,
}

pub struct TerrainLesson {
    path: PathBuf,
    heights: Option<Heightmap>,
    motion: Motion,

    vertices: Vec<TerrainVertex>,
    resources: GpuResources,
    depth: DepthTarget,
    gpu: Option<TerrainGpu>,
}

impl TerrainLesson {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            heights: None,
            motion: Motion::new(),
            vertices: Vec::new(),
            resources: GpuResources::new(),
            depth: DepthTarget::new(),
            gpu: None,
        }
    }

    /// Current orbit angle in radians.
    pub fn orbit_angle(&self) -> f32 {
        self.motion.angle(camera::ORBIT_RATE)
    }

    /// Reads the heightmap. Leaves the lesson untouched on failure.
    fn load_heights(&mut self) -> Result<()> {
        let heights = Heightmap::load(&self.path)
            .with_context(|| format!("loading {}", self.path.display()))?;
        log::info!(
            "terrain heightmap {} loaded (heights {:.2}..={:.2})",
            self.path.display(),
            heights.min(),
            heights.max()
        );
        self.heights = Some(heights);
        Ok(())
    }

    fn acquire_gpu(&mut self, gpu: &Gpu<'_>) -> TerrainGpu {
        let device = gpu.device();
        let vertex_bytes = (VERTEX_COUNT * std::mem::size_of::<TerrainVertex>()) as u64;

        let vbo = self.resources.acquire(
            "terrain vbo",
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("terrain vbo"),
                size: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        );

        let ubo_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain camera ubo"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo_buffer.as_entire_binding(),
            }],
        });

        let program = build_program(
            device,
            &ProgramDesc {
                label: "terrain",
                vertex_source: VERTEX_SHADER,
                fragment_source: FRAGMENT_SHADER,
                vertex_buffers: &[TerrainVertex::layout()],
                bind_group_layouts: &[&bgl],
                color_format: gpu.surface_format(),
                depth_format: Some(DEPTH_FORMAT),
            },
        );

        let ubo = self.resources.acquire("terrain camera ubo", ubo_buffer);
        self.resources.acquire("terrain bgl", bgl);
        let bind_group = self.resources.acquire("terrain bind group", bind_group);
        let pipeline = crate::install_program(&mut self.resources, "terrain pipeline", program);

        TerrainGpu {
            vbo,
            ubo,
            bind_group,
            pipeline,
        }
    }
}

impl App for TerrainLesson {
    fn on_load(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        self.load_heights()?;

        self.gpu = Some(self.acquire_gpu(gpu));
        self.vertices.reserve(VERTEX_COUNT);
        self.depth.ensure(gpu.device(), gpu.viewport());
        Ok(())
    }

    fn on_update(&mut self, time: FrameTime) {
        self.motion.advance(time.dt);
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (Some(heights), Some(tg)) = (self.heights.as_ref(), self.gpu.as_ref()) else {
            return AppControl::Continue;
        };

        let viewport = ctx.viewport();
        let view_proj = camera::view_projection(self.orbit_angle(), viewport.aspect());
        mesh::build_mesh(heights, &mut self.vertices);

        let resources = &self.resources;
        let vertices = &self.vertices;
        let depth = &mut self.depth;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            depth.ensure(rctx.device, rctx.viewport);

            let (Some(vbo), Some(ubo), Some(bind_group)) = (
                resources.get(tg.vbo),
                resources.get(tg.ubo),
                resources.get(tg.bind_group),
            ) else {
                return;
            };

            let camera = CameraUniform {
                view_proj: view_proj.to_cols_array_2d(),
            };
            rctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&camera));
            rctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

            let Some(pipeline) = tg.pipeline.and_then(|h| resources.get(h)) else {
                return;
            };

            let color = target.color_attachment();
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("terrain pass"),
                color_attachments: &[Some(color)],
                depth_stencil_attachment: depth.attachment(),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..vertices.len() as u32, 0..1);
        })
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, viewport: Viewport) {
        self.depth.ensure(gpu.device(), viewport);
    }

    fn on_unload(&mut self) {
        self.depth.release();
        let n = self.resources.release_all();
        log::debug!("terrain released {n} resources");
        self.gpu = None;
    }
}
