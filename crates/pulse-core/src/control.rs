//! Run control shared between the loop and the interruption source.
//!
//! [`ControlState`] carries a stop flag plus a wake notification. The
//! signal handler (or a test) calls [`request_stop`]; the run loop reads
//! the flag lock-free at iteration boundaries and observes the
//! notification inside [`pause`], the loop's only suspension point.
//!
//! [`request_stop`]: ControlState::request_stop
//! [`pause`]: ControlState::pause

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Outcome of a [`ControlState::pause`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The full pause duration elapsed.
    Elapsed,
    /// A stop request arrived before the duration elapsed.
    Interrupted,
}

/// Shared stop flag and wake notification.
///
/// Wrapped in [`Arc`](std::sync::Arc) and shared between the run loop and
/// the signal listener task. `request_stop` stores a permit on the notify,
/// so a stop issued between the flag check and the sleep still wakes the
/// pause.
#[derive(Debug, Default)]
pub struct ControlState {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Notification used to wake a pause in progress.
    stop_notify: Notify,
}

impl ControlState {
    /// Create a new control state with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a clean stop and wake any pause in progress.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Pause for `duration`, returning early when a stop request arrives.
    ///
    /// Returns [`PauseOutcome::Interrupted`] immediately if a stop was
    /// already requested, or as soon as one arrives mid-sleep; returns
    /// [`PauseOutcome::Elapsed`] when the full duration passes first.
    pub async fn pause(&self, duration: Duration) -> PauseOutcome {
        if self.is_stop_requested() {
            return PauseOutcome::Interrupted;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => PauseOutcome::Elapsed,
            () = self.stop_notify.notified() => PauseOutcome::Interrupted,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn initial_state_has_no_stop() {
        let control = ControlState::new();
        assert!(!control.is_stop_requested());
    }

    #[test]
    fn request_stop_sets_flag() {
        let control = ControlState::new();
        control.request_stop();
        assert!(control.is_stop_requested());
    }

    #[tokio::test]
    async fn short_pause_elapses() {
        let control = ControlState::new();
        let outcome = control.pause(Duration::from_millis(5)).await;
        assert_eq!(outcome, PauseOutcome::Elapsed);
    }

    #[tokio::test]
    async fn zero_pause_elapses_immediately() {
        let control = ControlState::new();
        let outcome = control.pause(Duration::ZERO).await;
        assert_eq!(outcome, PauseOutcome::Elapsed);
    }

    #[tokio::test]
    async fn pause_after_stop_is_interrupted() {
        let control = ControlState::new();
        control.request_stop();
        let outcome = control.pause(Duration::from_secs(60)).await;
        assert_eq!(outcome, PauseOutcome::Interrupted);
    }

    #[tokio::test]
    async fn stop_wakes_a_pause_in_progress() {
        let control = Arc::new(ControlState::new());

        let stopper = Arc::clone(&control);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            stopper.request_stop();
        });

        // Far longer than the test should take; the stop must cut it short.
        let outcome = control.pause(Duration::from_secs(60)).await;
        assert_eq!(outcome, PauseOutcome::Interrupted);

        handle.await.unwrap();
    }
}
