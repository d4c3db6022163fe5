//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single viewer window, translates raw
//! pointer/wheel/pinch gestures into normalized input records (device
//! pixels), and drives event-driven rendering: a frame is only ever drawn in
//! response to queued input, a resize, or an explicit redraw-again request.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
