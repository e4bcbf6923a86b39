use checkerlogo_render_wgpu::WgpuSurface;
use checkerlogo_surface::{MountTarget, SurfaceError, SurfaceId, SurfaceSize};
use std::sync::Arc;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

/// A winit window acting as the logo's container.
///
/// A window can back a single wgpu surface, so it hosts at most one.
pub struct WindowMount {
    window: Arc<Window>,
    attached: Option<SurfaceId>,
    next_id: u64,
    closed: bool,
}

impl WindowMount {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: None,
            next_id: 0,
            closed: false,
        }
    }

    /// Mark the window as gone; later detaches become no-ops.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Physical size to configure the surface with.
///
/// Some platforms resize synchronously and report the applied size; the
/// rest resize later, so fall back to the requested logical size.
fn surface_extent(
    applied: Option<PhysicalSize<u32>>,
    requested: LogicalSize<f64>,
    scale_factor: f64,
) -> PhysicalSize<u32> {
    applied.unwrap_or_else(|| requested.to_physical(scale_factor))
}

impl MountTarget for WindowMount {
    type Surface = WgpuSurface;

    fn append_surface(
        &mut self,
        size: SurfaceSize,
    ) -> Result<(SurfaceId, WgpuSurface), SurfaceError> {
        if self.closed {
            return Err(SurfaceError::TargetDetached);
        }
        if self.attached.is_some() {
            return Err(SurfaceError::ContextUnavailable(
                "window already hosts a surface".into(),
            ));
        }

        let logical = LogicalSize::new(f64::from(size.width), f64::from(size.height));
        let applied = self.window.request_inner_size(logical);
        let physical = surface_extent(applied, logical, self.window.scale_factor());

        let surface = WgpuSurface::new(self.window.clone(), physical.width, physical.height)?;
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.attached = Some(id);
        tracing::debug!(
            surface = id.0,
            width = physical.width,
            height = physical.height,
            "surface attached to window"
        );
        Ok((id, surface))
    }

    fn remove_surface(&mut self, id: SurfaceId) -> bool {
        if self.attached == Some(id) {
            self.attached = None;
            true
        } else {
            false
        }
    }

    fn is_connected(&self) -> bool {
        !self.closed
    }

    fn surface_count(&self) -> usize {
        usize::from(self.attached.is_some())
    }
}
