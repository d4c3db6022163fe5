//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application layer: one callback per frame, with the drained-once-per-frame
//! input queue and the GPU context handed in together.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
