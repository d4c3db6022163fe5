use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderStageKind};

/// One WGSL stage source that has passed parse + validation.
///
/// Holds the IR module for entry-point resolution and uniform reflection,
/// and the original source for handing to the device later.
#[derive(Debug)]
pub struct ValidatedStage {
    stage: ShaderStageKind,
    source: String,
    module: naga::Module,
}

impl ValidatedStage {
    /// Compiles `source` for `stage`.
    ///
    /// Diagnostics are rendered against the source text, so a failure carries
    /// the same annotated output the toolchain would print.
    pub fn compile(stage: ShaderStageKind, source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
            stage,
            diagnostic: e.emit_to_string(source),
        })?;

        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Compile {
                stage,
                diagnostic: e.emit_to_string(source),
            })?;

        Ok(Self {
            stage,
            source: source.to_owned(),
            module,
        })
    }

    #[inline]
    pub fn stage(&self) -> ShaderStageKind {
        self.stage
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    /// True when the module exports `name` as an entry point for this
    /// stage's execution model.
    pub fn has_entry_point(&self, name: &str) -> bool {
        let wanted = match self.stage {
            ShaderStageKind::Vertex => naga::ShaderStage::Vertex,
            ShaderStageKind::Fragment => naga::ShaderStage::Fragment,
        };

        self.module
            .entry_points
            .iter()
            .any(|ep| ep.stage == wanted && ep.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_vertex_stage() {
        let stage = ValidatedStage::compile(
            ShaderStageKind::Vertex,
            r#"
            @vertex
            fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position, 0.0, 1.0);
            }
            "#,
        )
        .unwrap();

        assert!(stage.has_entry_point("vs_main"));
        assert!(!stage.has_entry_point("fs_main"));
    }

    #[test]
    fn malformed_source_reports_the_stage_and_a_diagnostic() {
        let err = ValidatedStage::compile(
            ShaderStageKind::Fragment,
            "@fragment fn fs_main() -> { this is not wgsl }",
        )
        .unwrap_err();

        match &err {
            ShaderError::Compile { stage, diagnostic } => {
                assert_eq!(*stage, ShaderStageKind::Fragment);
                assert!(!diagnostic.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }

        // The rendered message names the failing stage.
        assert!(err.to_string().contains("fragment"));
    }

    #[test]
    fn validation_failures_are_compile_errors_too() {
        // Parses, but the entry point returns the wrong type.
        let err = ValidatedStage::compile(
            ShaderStageKind::Fragment,
            r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return 1.0;
            }
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn entry_point_lookup_respects_execution_model() {
        // A vertex entry point in a source compiled as the fragment stage
        // must not satisfy a fragment entry-point lookup.
        let stage = ValidatedStage::compile(
            ShaderStageKind::Fragment,
            r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return vec4<f32>(0.0, 0.0, 0.0, 1.0);
            }
            "#,
        )
        .unwrap();

        assert!(!stage.has_entry_point("vs_main"));
    }
}
