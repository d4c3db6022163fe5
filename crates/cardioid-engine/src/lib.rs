//! Cardioid engine crate.
//!
//! Owns the camera/viewport math, shader compilation, and the platform + GPU
//! runtime pieces the viewer binary composes.

pub mod camera;
pub mod core;
pub mod device;
pub mod input;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
