use super::{ShaderError, ShaderStageKind, UniformTable, ValidatedStage};

/// Entry point every vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A linked vertex + fragment pair with its reflected uniform table.
///
/// The program owns its two stages for its whole lifetime; it is built once
/// at startup and never hot-reloaded. The renderer turns it into a concrete
/// pipeline when a device exists.
#[derive(Debug)]
pub struct FractalProgram {
    vertex: ValidatedStage,
    fragment: ValidatedStage,
    uniforms: UniformTable,
}

impl FractalProgram {
    /// Compiles both stage sources and links them.
    ///
    /// Any failure here is fatal for initialization — the viewer cannot run
    /// without a working program — and the returned error carries the raw
    /// compiler diagnostic for the failing stage.
    pub fn compile_and_link(
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = ValidatedStage::compile(ShaderStageKind::Vertex, vertex_source)?;
        let fragment = ValidatedStage::compile(ShaderStageKind::Fragment, fragment_source)?;
        Self::link(vertex, fragment)
    }

    /// Links two validated stages: both canonical entry points must resolve,
    /// then the fragment stage's uniform blocks are reflected.
    pub fn link(vertex: ValidatedStage, fragment: ValidatedStage) -> Result<Self, ShaderError> {
        if !vertex.has_entry_point(VERTEX_ENTRY) {
            return Err(ShaderError::Link(format!(
                "vertex stage does not export entry point `{VERTEX_ENTRY}`"
            )));
        }
        if !fragment.has_entry_point(FRAGMENT_ENTRY) {
            return Err(ShaderError::Link(format!(
                "fragment stage does not export entry point `{FRAGMENT_ENTRY}`"
            )));
        }

        let uniforms = UniformTable::reflect(fragment.module());

        Ok(Self {
            vertex,
            fragment,
            uniforms,
        })
    }

    #[inline]
    pub fn vertex(&self) -> &ValidatedStage {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &ValidatedStage {
        &self.fragment
    }

    #[inline]
    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The shipped sources — linking them here keeps the embedded shaders
    // honest without needing a device.
    const VERT: &str = include_str!("../render/shaders/fractal.vert.wgsl");
    const FRAG: &str = include_str!("../render/shaders/fractal.frag.wgsl");

    #[test]
    fn shipped_sources_compile_and_link() {
        let program = FractalProgram::compile_and_link(VERT, FRAG).unwrap();

        assert!(program.vertex().has_entry_point(VERTEX_ENTRY));
        assert!(program.fragment().has_entry_point(FRAGMENT_ENTRY));

        // The kernel contract: a camera matrix plus the viewport basis.
        assert!(program.uniforms().lookup("camera").is_some());
        assert!(program.uniforms().lookup("viewport").is_some());
    }

    #[test]
    fn malformed_fragment_fails_before_linking() {
        let err = FractalProgram::compile_and_link(VERT, "@fragment fn broken(").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("fragment"));
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn missing_fragment_entry_point_is_a_link_error() {
        let frag = r#"
            @fragment
            fn colour() -> @location(0) vec4<f32> {
                return vec4<f32>(0.0, 0.0, 0.0, 1.0);
            }
        "#;

        let err = FractalProgram::compile_and_link(VERT, frag).unwrap_err();
        match err {
            ShaderError::Link(reason) => assert!(reason.contains(FRAGMENT_ENTRY)),
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn missing_vertex_entry_point_is_a_link_error() {
        let vert = r#"
            @vertex
            fn passthrough(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(p, 0.0, 1.0);
            }
        "#;

        let err = FractalProgram::compile_and_link(vert, FRAG).unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)));
    }
}
