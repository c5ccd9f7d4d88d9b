//! Frame pacing.
//!
//! The host owns the animation-frame source; the engine only sees the
//! millisecond deltas between frames that [`FrameLoop`] hands out.

use tracing::trace;

/// Token for a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host animation-frame source.
pub trait FrameScheduler {
    /// Ask for one more frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending request.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for headless hosts and tests: records requests, never calls back.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total frames requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total requests withdrawn.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.requested += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Turns frame timestamps into tick deltas.
///
/// The first frame after `start` only records a baseline. Frames delivered
/// after `stop` are ignored.
#[derive(Debug)]
pub struct FrameLoop<S> {
    scheduler: S,
    pending: Option<FrameHandle>,
    last_timestamp: Option<f64>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            last_timestamp: None,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Request the first frame. Already running loops are left alone.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.last_timestamp = None;
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    /// Cancel the pending frame and forget the baseline.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.last_timestamp = None;
    }

    /// Handle a frame callback at `timestamp` (ms).
    ///
    /// Returns the delta since the previous frame, or `None` for the
    /// baseline frame and for frames arriving while stopped.
    pub fn on_frame(&mut self, timestamp: f64) -> Option<f64> {
        if self.pending.take().is_none() {
            trace!(timestamp, "frame after stop ignored");
            return None;
        }

        let delta = self.last_timestamp.map(|last| (timestamp - last).max(0.0));
        self.last_timestamp = Some(timestamp);
        self.pending = Some(self.scheduler.request_frame());
        delta
    }
}
