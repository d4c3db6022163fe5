//! GPU rendering subsystem.
//!
//! One renderer, one pass: clear to opaque black, draw the full-screen
//! triangle with the fractal pipeline. A render is idempotent — unchanged
//! camera/viewport/uniform state reproduces the same framebuffer — and only
//! ever happens in response to a state transition; there is no animation
//! loop in the core.

mod fractal;
mod ramp;

pub use fractal::{FractalRenderer, FRAGMENT_SOURCE, VERTEX_SOURCE};
pub use ramp::DetailRamp;
