use crate::error::SurfaceError;
use checkerlogo_scene::Scene;

/// Logical size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Identifies a drawing surface among a mount target's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// A parent UI container that can host drawing surfaces.
///
/// The target only ever removes surfaces it appended; other children are
/// not the component's concern.
pub trait MountTarget {
    type Surface: DrawingSurface;

    /// Create a drawing surface with its own graphics context and attach it.
    fn append_surface(
        &mut self,
        size: SurfaceSize,
    ) -> Result<(SurfaceId, Self::Surface), SurfaceError>;

    /// Detach a surface. Returns `false` if it was not attached.
    fn remove_surface(&mut self, id: SurfaceId) -> bool;

    /// Whether the container still exists on the host side.
    fn is_connected(&self) -> bool;

    /// Number of surfaces currently attached.
    fn surface_count(&self) -> usize;
}

/// A graphics-context-backed drawing surface.
pub trait DrawingSurface {
    /// Render one pass of the scene from its camera.
    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError>;

    /// Release the graphics context and every GPU object it allocated.
    /// Calling it again is a no-op.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// A drawing surface together with the id its target knows it by.
#[derive(Debug)]
pub struct SurfaceBinding<S> {
    pub id: SurfaceId,
    pub surface: S,
}
