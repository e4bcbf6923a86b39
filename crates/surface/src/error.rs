/// Errors reported by mount targets and drawing surfaces.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("mount target is detached")]
    TargetDetached,
    #[error("surface lost; frame skipped")]
    Lost,
    #[error("surface already disposed")]
    Disposed,
    #[error("render failed: {0}")]
    Render(String),
}
