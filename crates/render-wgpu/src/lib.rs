//! wgpu render backend for the checkerboard logo.
//!
//! Draws the 16 board cells as instances of one shared box mesh with Phong
//! lighting from the scene's directional and ambient lights, antialiased
//! with MSAA over a transparent background.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Each surface owns its device; nothing is shared across surfaces.
//! - GPU objects are destroyed once, on dispose.

mod gpu;
mod shaders;
mod surface;

pub use gpu::{BoardRenderer, PREFERRED_SAMPLE_COUNT, SHININESS, pick_sample_count};
pub use surface::WgpuSurface;
