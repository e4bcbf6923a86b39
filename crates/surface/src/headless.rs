//! In-memory host: a mount target and drawing surface with no GPU.
//!
//! Used by the CLI to run the logo without a window and by lifecycle tests.

use crate::error::SurfaceError;
use crate::mount::{DrawingSurface, MountTarget, SurfaceId, SurfaceSize};
use checkerlogo_render::Renderer;
use checkerlogo_scene::Scene;
use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

/// Container that records the surfaces appended to it.
#[derive(Debug)]
pub struct HeadlessTarget<R> {
    connected: bool,
    next_id: u64,
    attached: Vec<SurfaceId>,
    removed: usize,
    fail_next_append: bool,
    disposals: Rc<Cell<u32>>,
    _renderer: PhantomData<R>,
}

impl<R> Default for HeadlessTarget<R> {
    fn default() -> Self {
        Self {
            connected: true,
            next_id: 0,
            attached: Vec::new(),
            removed: 0,
            fail_next_append: false,
            disposals: Rc::new(Cell::new(0)),
            _renderer: PhantomData,
        }
    }
}

impl<R> HeadlessTarget<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the host container going away.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Make the next `append_surface` fail as if no graphics context exists.
    pub fn fail_next_append(&mut self) {
        self.fail_next_append = true;
    }

    /// Number of successful detaches.
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// Shared count of surface disposals across every surface this target made.
    pub fn disposal_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.disposals)
    }
}

impl<R: Renderer + Default> MountTarget for HeadlessTarget<R> {
    type Surface = HeadlessSurface<R>;

    fn append_surface(
        &mut self,
        size: SurfaceSize,
    ) -> Result<(SurfaceId, Self::Surface), SurfaceError> {
        if !self.connected {
            return Err(SurfaceError::TargetDetached);
        }
        if std::mem::take(&mut self.fail_next_append) {
            return Err(SurfaceError::ContextUnavailable(
                "headless context refused".into(),
            ));
        }
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.attached.push(id);
        let surface = HeadlessSurface {
            size,
            renderer: R::default(),
            last_output: None,
            frames_rendered: 0,
            disposed: false,
            fail_next_render: false,
            disposals: Rc::clone(&self.disposals),
        };
        Ok((id, surface))
    }

    fn remove_surface(&mut self, id: SurfaceId) -> bool {
        let before = self.attached.len();
        self.attached.retain(|s| *s != id);
        let removed = self.attached.len() != before;
        if removed {
            self.removed += 1;
        }
        removed
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn surface_count(&self) -> usize {
        self.attached.len()
    }
}

/// Drawing surface that keeps the renderer output of the last frame.
#[derive(Debug)]
pub struct HeadlessSurface<R: Renderer> {
    size: SurfaceSize,
    renderer: R,
    last_output: Option<R::Output>,
    frames_rendered: u64,
    disposed: bool,
    fail_next_render: bool,
    disposals: Rc<Cell<u32>>,
}

impl<R: Renderer> HeadlessSurface<R> {
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn last_output(&self) -> Option<&R::Output> {
        self.last_output.as_ref()
    }

    /// Frames rendered successfully.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Make the next `render` fail.
    pub fn fail_next_render(&mut self) {
        self.fail_next_render = true;
    }
}

impl<R: Renderer> DrawingSurface for HeadlessSurface<R> {
    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        if std::mem::take(&mut self.fail_next_render) {
            return Err(SurfaceError::Render("headless render refused".into()));
        }
        self.last_output = Some(self.renderer.render(scene));
        self.frames_rendered += 1;
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.last_output = None;
        self.disposals.set(self.disposals.get() + 1);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkerlogo_render::{DebugTextRenderer, SnapshotRenderer};

    #[test]
    fn append_and_remove_track_children() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let (a, _sa) = target.append_surface(SurfaceSize::new(200, 200)).unwrap();
        let (b, _sb) = target.append_surface(SurfaceSize::new(200, 200)).unwrap();
        assert_ne!(a, b);
        assert_eq!(target.surface_count(), 2);

        assert!(target.remove_surface(a));
        assert!(!target.remove_surface(a));
        assert_eq!(target.surface_count(), 1);
        assert_eq!(target.removed_count(), 1);
    }

    #[test]
    fn detached_target_refuses_surfaces() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        target.disconnect();
        let err = target.append_surface(SurfaceSize::new(1, 1)).unwrap_err();
        assert!(matches!(err, SurfaceError::TargetDetached));
    }

    #[test]
    fn surface_keeps_last_output_until_disposed() {
        let mut target = HeadlessTarget::<SnapshotRenderer>::new();
        let (_, mut surface) = target.append_surface(SurfaceSize::new(200, 200)).unwrap();

        let mut scene = Scene::new();
        scene.advance(0.0);
        surface.render(&scene).unwrap();
        assert_eq!(surface.last_output().unwrap().frame, 1);

        surface.dispose();
        surface.dispose();
        assert!(surface.is_disposed());
        assert!(surface.last_output().is_none());
        assert_eq!(target.disposal_counter().get(), 1);
        assert!(matches!(surface.render(&scene), Err(SurfaceError::Disposed)));
    }
}
