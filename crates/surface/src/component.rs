use crate::clock::Clock;
use crate::error::SurfaceError;
use crate::mount::{DrawingSurface, MountTarget, SurfaceBinding, SurfaceSize};
use crate::schedule::{FrameRequest, FrameScheduler};
use checkerlogo_scene::Scene;

/// Fixed logical size of the logo surface.
pub const LOGO_SIZE: SurfaceSize = SurfaceSize::new(200, 200);

/// Lifecycle of an [`AnimatedRenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    /// Never mounted, mounted without a target, or torn down.
    Unmounted,
    /// Bound to a surface with one frame request outstanding.
    Running,
}

/// The animated checkerboard logo bound to one drawing surface.
///
/// Owns its scene and surface exclusively. While running, exactly one frame
/// request is pending with the host scheduler; each serviced request
/// advances the scene, renders it, and re-arms. [`unmount`] is the only way
/// to stop the loop.
///
/// [`unmount`]: AnimatedRenderSurface::unmount
#[derive(Debug)]
pub struct AnimatedRenderSurface<S: DrawingSurface> {
    scene: Scene,
    binding: Option<SurfaceBinding<S>>,
    pending: Option<FrameRequest>,
    state: MountState,
}

impl<S: DrawingSurface> AnimatedRenderSurface<S> {
    /// Build the scene, attach a surface to `target`, and run the first frame.
    ///
    /// With no target, or a target that cannot provide a graphics context,
    /// the component is inert: nothing is attached or scheduled.
    pub fn mount<T, F, C>(target: Option<&mut T>, scheduler: &mut F, clock: &C) -> Self
    where
        T: MountTarget<Surface = S> + ?Sized,
        F: FrameScheduler + ?Sized,
        C: Clock + ?Sized,
    {
        let _span = tracing::info_span!("logo_mount").entered();
        let mut component = Self {
            scene: Scene::new(),
            binding: None,
            pending: None,
            state: MountState::Unmounted,
        };

        let Some(target) = target else {
            tracing::debug!("no mount target; logo stays inert");
            return component;
        };
        if !target.is_connected() {
            tracing::debug!("mount target detached; logo stays inert");
            return component;
        }

        match target.append_surface(LOGO_SIZE) {
            Ok((id, surface)) => {
                tracing::info!(surface = id.0, "logo surface mounted");
                component.binding = Some(SurfaceBinding { id, surface });
                component.state = MountState::Running;
                component.step(clock.now_millis(), scheduler);
            }
            Err(e) => {
                tracing::warn!("logo surface unavailable: {e}");
            }
        }
        component
    }

    /// Service a frame request from the host.
    ///
    /// Returns `true` if a frame ran. Requests other than the outstanding one
    /// (stale or foreign) and any request after teardown are ignored.
    pub fn on_frame<F>(&mut self, request: FrameRequest, now_ms: f64, scheduler: &mut F) -> bool
    where
        F: FrameScheduler + ?Sized,
    {
        if self.state != MountState::Running || self.pending != Some(request) {
            tracing::trace!(request = request.0, "ignoring frame request");
            return false;
        }
        self.pending = None;
        self.step(now_ms, scheduler);
        true
    }

    /// Stop the loop, release the graphics context, and detach the surface.
    ///
    /// Safe to call any number of times. A missing or disconnected target
    /// skips the detach; the surface is still disposed.
    pub fn unmount<T, F>(&mut self, target: Option<&mut T>, scheduler: &mut F)
    where
        T: MountTarget<Surface = S> + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.state = MountState::Unmounted;
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
        }

        let Some(mut binding) = self.binding.take() else {
            return;
        };
        binding.surface.dispose();
        match target {
            Some(target) if target.is_connected() => {
                if !target.remove_surface(binding.id) {
                    tracing::debug!(surface = binding.id.0, "surface was already detached");
                }
            }
            _ => tracing::debug!(surface = binding.id.0, "mount target gone; skipping detach"),
        }
        tracing::info!(
            surface = binding.id.0,
            frames = self.scene.frame(),
            "logo surface torn down"
        );
    }

    /// Steps 1-4 of a frame: spin and bob, render, re-arm.
    fn step<F>(&mut self, now_ms: f64, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        self.scene.advance(now_ms);
        match binding.surface.render(&self.scene) {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                tracing::debug!(frame = self.scene.frame(), "surface lost; frame skipped");
            }
            Err(e) => {
                tracing::warn!(frame = self.scene.frame(), "render failed: {e}");
            }
        }
        if self.state == MountState::Running {
            self.pending = Some(scheduler.request_frame());
        }
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MountState::Running
    }

    /// Number of frames advanced since mount.
    pub fn frames(&self) -> u64 {
        self.scene.frame()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn surface(&self) -> Option<&S> {
        self.binding.as_ref().map(|b| &b.surface)
    }

    /// Host access for surface maintenance such as resizing.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.binding.as_mut().map(|b| &mut b.surface)
    }
}

impl<S: DrawingSurface> Drop for AnimatedRenderSurface<S> {
    fn drop(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            tracing::debug!(surface = binding.id.0, "logo dropped while mounted; disposing");
            binding.surface.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::headless::{HeadlessSurface, HeadlessTarget};
    use crate::schedule::FrameQueue;
    use checkerlogo_render::DebugTextRenderer;
    use checkerlogo_scene::animation::{BOB_AMPLITUDE, ROTATION_STEP};

    type Logo = AnimatedRenderSurface<HeadlessSurface<DebugTextRenderer>>;

    fn run_frames(logo: &mut Logo, queue: &mut FrameQueue, clock: &ManualClock, n: usize) {
        for _ in 0..n {
            clock.advance(16.0);
            for request in queue.take_due() {
                logo.on_frame(request, clock.now_millis(), queue);
            }
        }
    }

    #[test]
    fn mount_attaches_one_surface_and_runs_first_frame() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);

        let logo = Logo::mount(Some(&mut target), &mut queue, &clock);

        assert_eq!(logo.state(), MountState::Running);
        assert_eq!(target.surface_count(), 1);
        assert_eq!(logo.frames(), 1);
        assert_eq!(logo.surface().unwrap().frames_rendered(), 1);
        assert_eq!(logo.surface().unwrap().size(), LOGO_SIZE);
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn frames_rotate_by_fixed_step_and_bob_within_bounds() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);

        let mut previous = logo.scene().board().rotation_y();
        for _ in 0..200 {
            run_frames(&mut logo, &mut queue, &clock, 1);
            let board = logo.scene().board();
            assert!((board.rotation_y() - previous - ROTATION_STEP).abs() < 1e-5);
            assert!(board.offset_y().abs() <= BOB_AMPLITUDE);
            previous = board.rotation_y();
            // Exactly one outstanding request per running instance.
            assert_eq!(queue.pending_count(), 1);
        }
        assert_eq!(logo.frames(), 201);
    }

    #[test]
    fn teardown_twice_is_safe_and_detaches_once() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);

        logo.unmount(Some(&mut target), &mut queue);
        assert_eq!(target.surface_count(), 0);
        assert_eq!(target.removed_count(), 1);
        assert_eq!(logo.state(), MountState::Unmounted);

        logo.unmount(Some(&mut target), &mut queue);
        assert_eq!(target.surface_count(), 0);
        assert_eq!(target.removed_count(), 1);
    }

    #[test]
    fn missing_target_is_inert() {
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);

        let mut logo = Logo::mount(None::<&mut HeadlessTarget<DebugTextRenderer>>, &mut queue, &clock);
        assert_eq!(logo.state(), MountState::Unmounted);
        assert_eq!(logo.frames(), 0);
        assert_eq!(queue.pending_count(), 0);
        assert!(logo.surface().is_none());

        logo.unmount(None::<&mut HeadlessTarget<DebugTextRenderer>>, &mut queue);
        assert_eq!(logo.state(), MountState::Unmounted);
    }

    #[test]
    fn detached_target_is_inert() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        target.disconnect();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);

        let logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        assert!(!logo.is_running());
        assert_eq!(target.surface_count(), 0);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn context_failure_is_inert() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        target.fail_next_append();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);

        let logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        assert!(!logo.is_running());
        assert_eq!(target.surface_count(), 0);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn no_frames_after_teardown() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        run_frames(&mut logo, &mut queue, &clock, 5);
        let stale = logo.pending_request().unwrap();

        logo.unmount(Some(&mut target), &mut queue);
        let frames_at_teardown = logo.frames();
        assert_eq!(queue.pending_count(), 0);

        // A host that already dequeued the request still delivers it.
        assert!(!logo.on_frame(stale, clock.now_millis(), &mut queue));
        run_frames(&mut logo, &mut queue, &clock, 10);
        assert_eq!(logo.frames(), frames_at_teardown);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn stale_request_is_ignored_while_running() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        let first = logo.pending_request().unwrap();
        run_frames(&mut logo, &mut queue, &clock, 1);

        let frames = logo.frames();
        assert!(!logo.on_frame(first, clock.now_millis(), &mut queue));
        assert_eq!(logo.frames(), frames);
    }

    #[test]
    fn teardown_with_target_gone_still_disposes() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        let disposals = target.disposal_counter();

        target.disconnect();
        logo.unmount(Some(&mut target), &mut queue);
        assert_eq!(disposals.get(), 1);
        assert_eq!(target.removed_count(), 0);

        logo.unmount(None::<&mut HeadlessTarget<DebugTextRenderer>>, &mut queue);
        assert_eq!(disposals.get(), 1);
    }

    #[test]
    fn surface_disposed_exactly_once_across_unmount_and_drop() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let disposals = target.disposal_counter();

        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        logo.unmount(Some(&mut target), &mut queue);
        drop(logo);
        assert_eq!(disposals.get(), 1);

        let logo = Logo::mount(Some(&mut target), &mut queue, &clock);
        drop(logo);
        assert_eq!(disposals.get(), 2);
    }

    #[test]
    fn render_failure_keeps_loop_alive() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut logo = Logo::mount(Some(&mut target), &mut queue, &clock);

        logo.binding.as_mut().unwrap().surface.fail_next_render();
        run_frames(&mut logo, &mut queue, &clock, 3);

        assert!(logo.is_running());
        assert_eq!(logo.frames(), 4);
        assert_eq!(logo.surface().unwrap().frames_rendered(), 3);
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut target = HeadlessTarget::<DebugTextRenderer>::new();
        let mut queue = FrameQueue::new();
        let clock = ManualClock::new(0.0);
        let mut a = Logo::mount(Some(&mut target), &mut queue, &clock);
        let mut b = Logo::mount(Some(&mut target), &mut queue, &clock);
        assert_eq!(target.surface_count(), 2);

        a.unmount(Some(&mut target), &mut queue);
        for request in queue.take_due() {
            a.on_frame(request, 16.0, &mut queue);
            b.on_frame(request, 16.0, &mut queue);
        }
        assert_eq!(a.frames(), 1);
        assert_eq!(b.frames(), 2);
        assert_eq!(target.surface_count(), 1);
    }
}
