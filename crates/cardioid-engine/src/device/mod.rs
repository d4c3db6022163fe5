//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue, configures the surface,
//! and hands frames (texture view + encoder) to the renderer. The rest of
//! the engine treats this as the capability interface to the GPU — nothing
//! above this module touches surface configuration.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
