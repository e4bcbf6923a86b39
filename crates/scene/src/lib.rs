//! Scene graph for the checkerboard logo.
//!
//! # Invariants
//! - The board always holds exactly 16 cells with alternating colors.
//! - Lights and camera are fixed after construction.
//! - Per-frame motion touches only the board's rotation and vertical offset.

pub mod animation;
pub mod board;
pub mod camera;
pub mod light;
mod scene;

pub use board::{Board, BoxShape, CELL_COUNT, CellColor, GRID_SIZE, GridCell};
pub use camera::PerspectiveCamera;
pub use light::{AmbientLight, DirectionalLight};
pub use scene::Scene;
