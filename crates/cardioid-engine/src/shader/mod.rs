//! Shader program front end.
//!
//! Compiles the two WGSL stage sources on the host (parse + validate, full
//! diagnostics), links them by resolving the canonical entry points, and
//! reflects the fragment stage's uniform blocks into a name → offset table.
//!
//! Running the same front end the GPU stack uses means a source that passes
//! here is the source the device receives; failures surface before any
//! adapter exists, with the compiler's own rendered diagnostics.

mod error;
mod program;
mod stage;
mod uniforms;

pub use error::{ShaderError, ShaderStageKind};
pub use program::{FractalProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use stage::ValidatedStage;
pub use uniforms::{UniformBlock, UniformSlot, UniformStaging, UniformTable};
