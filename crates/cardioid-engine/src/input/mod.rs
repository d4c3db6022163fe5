//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The
//! runtime translates raw window-system gestures into the normalized records
//! here; everything downstream consumes device pixels only.

mod events;
mod queue;

pub use events::{InputEvent, PanZoomEvent, ResizeEvent};
pub use queue::InputQueue;
