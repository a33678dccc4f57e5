//! Static quad geometry and uniform plumbing shared by the quad lessons.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use firstlight_engine::render::{GpuResources, Handle};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[rustfmt::skip]
pub(crate) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { pos: [ 0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { pos: [ 0.5,  0.5], uv: [1.0, 0.0] },
    QuadVertex { pos: [-0.5,  0.5], uv: [0.0, 0.0] },
];

pub(crate) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// GPU objects every quad lesson acquires at load.
pub(crate) struct QuadBuffers {
    pub vbo: Handle<wgpu::Buffer>,
    pub ibo: Handle<wgpu::Buffer>,
    pub ubo: Handle<wgpu::Buffer>,
    pub bind_group_layout: Handle<wgpu::BindGroupLayout>,
    pub bind_group: Handle<wgpu::BindGroup>,
}

impl QuadBuffers {
    /// Uploads the quad once and creates a uniform buffer of `U`'s size bound
    /// at group 0, binding 0 for both stages.
    pub(crate) fn acquire<U: Pod>(
        device: &wgpu::Device,
        resources: &mut GpuResources,
        initial: &U,
    ) -> Self {
        let vbo = resources.acquire(
            "quad vbo",
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            }),
        );

        let ibo = resources.acquire(
            "quad ibo",
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }),
        );

        let ubo_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad ubo"),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<U>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo_buffer.as_entire_binding(),
            }],
        });

        let ubo = resources.acquire("quad ubo", ubo_buffer);
        let bind_group_layout = resources.acquire("quad bgl", bgl);
        let bind_group = resources.acquire("quad bind group", bind_group);

        Self {
            vbo,
            ibo,
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Records one indexed draw of the quad with `pipeline`.
    ///
    /// Does nothing if any handle no longer resolves.
    pub(crate) fn draw(
        &self,
        resources: &GpuResources,
        pipeline: &wgpu::RenderPipeline,
        rpass: &mut wgpu::RenderPass<'_>,
    ) {
        let (Some(vbo), Some(ibo), Some(bind_group)) = (
            resources.get(self.vbo),
            resources.get(self.ibo),
            resources.get(self.bind_group),
        ) else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_form_two_triangles_over_four_corners() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn quad_is_centered_on_origin() {
        let sum = QUAD_VERTICES
            .iter()
            .fold([0.0f32; 2], |acc, v| [acc[0] + v.pos[0], acc[1] + v.pos[1]]);
        assert_eq!(sum, [0.0, 0.0]);
    }

    #[test]
    fn uvs_span_unit_square() {
        for v in QUAD_VERTICES {
            assert!(v.uv.iter().all(|&c| c == 0.0 || c == 1.0));
        }
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
    }
}
