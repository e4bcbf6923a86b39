//! Shared value types for the checkerboard logo crates.

mod types;

pub use types::{Color, Transform};
