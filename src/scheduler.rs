//! Frame scheduling: an explicit, cancellable "request next frame" loop.
//!
//! The host owns the timing (`requestAnimationFrame` in a browser, a test
//! driver elsewhere). [`FrameLoop`] tracks the one outstanding request and a
//! cancellation token, so a frame is painted only if it was requested and the
//! loop has not been stopped, and the next frame is requested only after the
//! current one finished.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::error::BackdropError;

/// Opaque id of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Host facility that invokes a callback once per display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, BackdropError>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Shared stop flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

pub struct FrameLoop<F: FrameScheduler> {
    scheduler: F,
    pending: Option<FrameHandle>,
    token: CancellationToken,
    painted: u64,
}

impl<F: FrameScheduler> FrameLoop<F> {
    pub fn new(scheduler: F) -> Self {
        Self {
            scheduler,
            pending: None,
            token: CancellationToken::new(),
            painted: 0,
        }
    }

    /// Request the first frame. No-op when already pending or stopped.
    pub fn start(&mut self) -> Result<(), BackdropError> {
        if self.token.is_cancelled() || self.pending.is_some() {
            return Ok(());
        }
        self.schedule()
    }

    /// Called when a frame fires. Returns whether the frame should be painted.
    pub fn begin_frame(&mut self) -> bool {
        let requested = self.pending.take().is_some();
        requested && !self.token.is_cancelled()
    }

    /// Called after a frame has been painted; requests the next one.
    pub fn end_frame(&mut self) -> Result<(), BackdropError> {
        self.painted += 1;
        if self.token.is_cancelled() {
            return Ok(());
        }
        self.schedule()
    }

    fn schedule(&mut self) -> Result<(), BackdropError> {
        match self.scheduler.request_frame() {
            Ok(handle) => {
                trace!(handle = handle.0, "frame requested");
                self.pending = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.token.cancel();
                Err(err)
            }
        }
    }

    /// Cancel the token and any outstanding request. Idempotent.
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Stop, then start over with a fresh token.
    pub fn restart(&mut self) -> Result<(), BackdropError> {
        self.stop();
        self.token = CancellationToken::new();
        self.painted = 0;
        self.start()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.pending.is_some()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn frames_painted(&self) -> u64 {
        self.painted
    }
}

impl<F: FrameScheduler> Drop for FrameLoop<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
struct ManualQueue {
    next_id: i32,
    pending: Option<FrameHandle>,
    requested: u32,
    cancelled: Vec<FrameHandle>,
    fail_next: Option<String>,
}

/// Scheduler driven by hand, for headless rendering and tests.
///
/// Clones share one queue, so a test can keep a clone to inspect requests
/// after handing the scheduler to a [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request a host would fire next, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.queue.borrow().pending
    }

    pub fn requested(&self) -> u32 {
        self.queue.borrow().requested
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.queue.borrow().cancelled.clone()
    }

    /// Make the next request fail with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.queue.borrow_mut().fail_next = Some(reason.into());
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, BackdropError> {
        let mut q = self.queue.borrow_mut();
        if let Some(reason) = q.fail_next.take() {
            return Err(BackdropError::Scheduler(reason));
        }
        q.next_id += 1;
        q.requested += 1;
        let handle = FrameHandle(q.next_id);
        q.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut q = self.queue.borrow_mut();
        if q.pending == Some(handle) {
            q.pending = None;
        }
        q.cancelled.push(handle);
    }
}
