use std::collections::BTreeSet;

/// Handle for one "run before the next repaint" registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

/// Host primitive that runs a callback before the next repaint.
pub trait FrameScheduler {
    /// Register interest in the next display refresh.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraw a registration. Returns `false` if it was not pending.
    fn cancel_frame(&mut self, request: FrameRequest) -> bool;
}

/// Pending frame requests, drained by the host once per display refresh.
///
/// An optional waker is invoked on every request so that event-loop hosts
/// can ask the platform for a redraw.
#[derive(Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameRequest>,
    waker: Option<Box<dyn FnMut()>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waker(waker: impl FnMut() + 'static) -> Self {
        Self {
            waker: Some(Box::new(waker)),
            ..Self::default()
        }
    }

    /// Take every request due at this refresh, oldest first.
    ///
    /// Requests made while the returned batch is being serviced land in the
    /// next refresh.
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.insert(request);
        if let Some(wake) = self.waker.as_mut() {
            wake();
        }
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) -> bool {
        self.pending.remove(&request)
    }
}

impl std::fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameQueue")
            .field("next_id", &self.next_id)
            .field("pending", &self.pending)
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn requests_are_unique_and_pending() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.pending_count(), 2);
        assert!(queue.is_pending(a));
    }

    #[test]
    fn take_due_drains_in_order() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_eq!(queue.take_due(), vec![a, b]);
        assert_eq!(queue.pending_count(), 0);
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn cancel_removes_pending_request() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        assert!(queue.cancel_frame(a));
        assert!(!queue.cancel_frame(a));
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn waker_fires_per_request() {
        let wakes = Rc::new(Cell::new(0));
        let counter = wakes.clone();
        let mut queue = FrameQueue::with_waker(move || counter.set(counter.get() + 1));
        queue.request_frame();
        queue.request_frame();
        assert_eq!(wakes.get(), 2);
    }
}
