//! Animated Render Surface: the logo's mount, per-frame loop, and teardown.
//!
//! The host supplies three collaborators through traits: a [`MountTarget`]
//! that hosts drawing surfaces, a [`FrameScheduler`] that runs a callback
//! before the next repaint, and a [`Clock`].
//!
//! # Invariants
//! - At most one frame request is outstanding per running instance.
//! - No frame runs after teardown, stale requests included.
//! - The drawing surface is disposed exactly once.

mod clock;
mod component;
mod error;
pub mod headless;
mod mount;
mod schedule;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use component::{AnimatedRenderSurface, LOGO_SIZE, MountState};
pub use error::SurfaceError;
pub use mount::{DrawingSurface, MountTarget, SurfaceBinding, SurfaceId, SurfaceSize};
pub use schedule::{FrameQueue, FrameRequest, FrameScheduler};

pub fn crate_info() -> &'static str {
    "checkerlogo-surface v0.1.0"
}
