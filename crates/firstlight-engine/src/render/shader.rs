use std::fmt;

/// Programmable pipeline stage a shader source targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every lesson shader uses for this stage.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex shader"),
            ShaderStage::Fragment => f.write_str("fragment shader"),
        }
    }
}

/// Shader build failures.
///
/// These are reported through the log and never abort a lesson.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShaderError {
    #[error("Error compiling {label} {stage}: {log}")]
    Compile {
        label: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("Error linking {label}: {log}")]
    Link { label: String, log: String },
}

/// Compiles one stage's WGSL source.
///
/// A module is always returned. When validation fails the diagnostic is
/// logged and returned alongside; a pipeline built from that module will fail
/// to link in turn.
pub fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> (wgpu::ShaderModule, Option<ShaderError>) {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} {stage}")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let error = pollster::block_on(error_scope.pop()).map(|e| ShaderError::Compile {
        label: label.to_string(),
        stage,
        log: e.to_string(),
    });

    match &error {
        Some(e) => log::error!("{e}"),
        None => log::debug!("compiled {label} {stage}"),
    }

    (module, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_are_readable() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex shader");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment shader");
    }

    #[test]
    fn entry_points_match_stage() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
    }

    #[test]
    fn compile_error_names_stage_and_diagnostic() {
        let err = ShaderError::Compile {
            label: "terrain".into(),
            stage: ShaderStage::Fragment,
            log: "expected ';'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error compiling terrain fragment shader: expected ';'"
        );
    }

    #[test]
    fn invalid_vertex_source_names_the_stage() {
        let device = super::super::test_device();
        let (_module, err) =
            compile_stage(&device, "spin", ShaderStage::Vertex, "@vertex fn vs_main() -> f32 {");

        let err = err.expect("invalid WGSL must be reported");
        assert!(err.to_string().starts_with("Error compiling spin vertex shader: "));
    }

    #[test]
    fn valid_source_has_no_error() {
        let device = super::super::test_device();
        let source = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let (_module, err) = compile_stage(&device, "ok", ShaderStage::Fragment, source);
        assert!(err.is_none());
    }
}
