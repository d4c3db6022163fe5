use std::fmt;

/// Which pipeline stage a source blob feeds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStageKind::Vertex => "vertex",
            ShaderStageKind::Fragment => "fragment",
        })
    }
}

/// Shader build failure. Fatal at startup — there is no fallback rendering
/// path, so these propagate to `main` with the diagnostic text intact.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// Parse or validation failure in one stage, with the compiler's
    /// rendered diagnostic (source spans included).
    #[error("{stage} shader failed to compile:\n{diagnostic}")]
    Compile {
        stage: ShaderStageKind,
        diagnostic: String,
    },

    /// Both stages compiled but do not form a runnable program.
    #[error("shader program failed to link: {0}")]
    Link(String),
}
