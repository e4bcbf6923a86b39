//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate the scene.
//! - Render output derives only from scene state, camera included.
//!
//! The GPU backend lives in `checkerlogo-render-wgpu`; the renderers here
//! produce text and structured snapshots for headless hosts and tests.

mod renderer;
mod snapshot;

pub use renderer::{DebugTextRenderer, Renderer};
pub use snapshot::{CellSnapshot, FrameSnapshot, SnapshotRenderer};

pub fn crate_info() -> &'static str {
    "checkerlogo-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
