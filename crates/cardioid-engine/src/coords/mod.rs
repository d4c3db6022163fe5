//! Coordinate types shared across the camera and renderer.
//!
//! Canonical CPU space:
//! - Device (physical) pixels — device-pixel-ratio is applied at the
//!   platform boundary, never inside the engine
//! - Origin top-left, +X right, +Y down
//!
//! The camera re-expresses positions as centered pixel offsets (y-up) before
//! mapping them into fractal space; shaders rebuild that basis from the
//! viewport uniform.

mod viewport;

pub use viewport::Viewport;
