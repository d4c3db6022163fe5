//! Camera/viewport subsystem.
//!
//! Maintains the affine transform from screen space to fractal (world) space
//! and updates it incrementally from normalized input deltas. The transform
//! maps *centered device-pixel offsets* (y-up) to world coordinates, so its
//! linear part stays a uniform scale regardless of canvas aspect ratio.

mod affine;
mod controller;

pub use affine::Affine2;
pub use controller::{Camera, DegenerateViewport, ZOOM_SENSITIVITY};
