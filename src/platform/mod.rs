//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Frame scheduling (`requestAnimationFrame` on web)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Host facility that runs a callback on the next frame
pub trait FrameScheduler {
    /// Identifies one pending request
    type Handle: Copy + std::fmt::Debug;

    /// Ask for one callback; `None` if the host refused
    fn request(&mut self) -> Option<Self::Handle>;

    /// Withdraw a pending request
    fn cancel(&mut self, handle: Self::Handle);
}

/// Keeps at most one frame request outstanding
///
/// Every path that wants another frame goes through [`FrameLoop::schedule`],
/// which withdraws the previous request first. Restarting the game can
/// therefore never leave two loops running.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Request the next frame, replacing any pending request
    pub fn schedule(&mut self) {
        self.cancel();
        self.pending = self.scheduler.request();
        if self.pending.is_none() {
            log::warn!("Frame request refused by host");
        }
    }

    /// Withdraw the pending request, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Call at the top of the frame callback: the request has been consumed
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Scheduler that tracks which requests are live
    #[derive(Default)]
    struct FakeScheduler {
        next: u32,
        live: BTreeSet<u32>,
        max_live: usize,
    }

    impl FrameScheduler for FakeScheduler {
        type Handle = u32;

        fn request(&mut self) -> Option<u32> {
            self.next += 1;
            self.live.insert(self.next);
            self.max_live = self.max_live.max(self.live.len());
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.live.remove(&handle);
        }
    }

    #[test]
    fn test_reschedule_cancels_previous() {
        let mut frames = FrameLoop::new(FakeScheduler::default());
        frames.schedule();
        frames.schedule();
        frames.schedule();
        assert!(frames.is_pending());
        assert_eq!(frames.scheduler().live.len(), 1);
        assert_eq!(frames.scheduler().max_live, 1);
    }

    #[test]
    fn test_cancel_and_fire() {
        let mut frames = FrameLoop::new(FakeScheduler::default());
        frames.schedule();
        frames.cancel();
        assert!(!frames.is_pending());
        assert!(frames.scheduler().live.is_empty());

        // Cancelling twice is harmless
        frames.cancel();

        frames.schedule();
        frames.fired();
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_now_ms_is_recent() {
        // Past 2020-01-01
        assert!(now_ms() > 1_577_836_800_000.0);
    }
}
