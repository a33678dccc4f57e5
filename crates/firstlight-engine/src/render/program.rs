use super::shader::{compile_stage, ShaderError, ShaderStage};

/// Everything needed to turn a vertex/fragment source pair into a pipeline.
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    /// Enables depth testing (`Less`, with writes) against this format.
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// Result of building a program.
///
/// `pipeline` is `None` when compilation or linking failed; the failures are
/// listed in `errors` and have already been logged. Neither case panics.
pub struct Program {
    pub pipeline: Option<wgpu::RenderPipeline>,
    pub errors: Vec<ShaderError>,
}

impl Program {
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.pipeline.is_some()
    }
}

/// Compiles both stages and links them into a triangle-list pipeline.
pub fn build_program(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Program {
    let (vs, vs_err) = compile_stage(device, desc.label, ShaderStage::Vertex, desc.vertex_source);
    let (fs, fs_err) = compile_stage(
        device,
        desc.label,
        ShaderStage::Fragment,
        desc.fragment_source,
    );
    let mut errors: Vec<ShaderError> = vs_err.into_iter().chain(fs_err).collect();

    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} pipeline layout", desc.label)),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} pipeline", desc.label)),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &vs,
            entry_point: Some(ShaderStage::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: desc.vertex_buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &fs,
            entry_point: Some(ShaderStage::Fragment.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: desc.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    match pollster::block_on(error_scope.pop()) {
        None if errors.is_empty() => {
            log::debug!("linked {} pipeline", desc.label);
            Program {
                pipeline: Some(pipeline),
                errors,
            }
        }
        link_err => {
            if let Some(e) = link_err {
                let e = ShaderError::Link {
                    label: desc.label.to_string(),
                    log: e.to_string(),
                };
                log::error!("{e}");
                errors.push(e);
            }
            Program {
                pipeline: None,
                errors,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "
        @vertex
        fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
        }
    ";

    const FRAGMENT: &str = "
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.5, 0.0, 1.0);
        }
    ";

    fn desc<'a>(vertex_source: &'a str, fragment_source: &'a str) -> ProgramDesc<'a> {
        ProgramDesc {
            label: "test",
            vertex_source,
            fragment_source,
            vertex_buffers: &[],
            bind_group_layouts: &[],
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_format: None,
        }
    }

    #[test]
    fn valid_sources_link() {
        let device = super::super::test_device();
        let program = build_program(&device, &desc(VERTEX, FRAGMENT));

        assert!(program.is_linked());
        assert!(program.errors.is_empty());
    }

    #[test]
    fn depth_tested_program_links() {
        let device = super::super::test_device();
        let program = build_program(
            &device,
            &ProgramDesc {
                depth_format: Some(crate::render::DEPTH_FORMAT),
                ..desc(VERTEX, FRAGMENT)
            },
        );
        assert!(program.is_linked());
    }

    #[test]
    fn broken_fragment_shader_is_reported_not_fatal() {
        let device = super::super::test_device();
        let program = build_program(&device, &desc(VERTEX, "@fragment fn fs_main( -> {"));

        assert!(!program.is_linked());
        match program.errors.first() {
            Some(ShaderError::Compile { label, stage, log }) => {
                assert_eq!(label, "test");
                assert_eq!(*stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected a fragment compile error, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let device = super::super::test_device();
        let renamed = FRAGMENT.replace("fs_main", "main");
        let program = build_program(&device, &desc(VERTEX, &renamed));

        assert!(!program.is_linked());
        assert!(program
            .errors
            .iter()
            .any(|e| matches!(e, ShaderError::Link { .. })));
    }
}
