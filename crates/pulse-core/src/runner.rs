//! The bounded run loop.
//!
//! This module provides [`run_loop`], the top-level async function that
//! drives the logging iterations with support for:
//!
//! - **Bounded execution**: stop after the configured iteration count
//! - **Clean interruption**: a stop request ends the run at the next
//!   iteration boundary or mid-pause, whichever comes first
//! - **Graceful sink failure**: a failed append ends the run with a
//!   reported end reason instead of an unwind
//!
//! Each iteration renders one [`LogEntry`], appends it to the sink with
//! an immediate flush, hands the same line to the [`IterationCallback`],
//! and then pauses for the configured interval. Failures are encoded as
//! [`RunEndReason`] values; the loop itself never returns an error.
//!
//! [`LogEntry`]: crate::entry::LogEntry

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::control::{ControlState, PauseOutcome};
use crate::entry::LogEntry;
use crate::sink::LogSink;

/// Reason why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// Reached the configured iteration bound.
    IterationsCompleted,
    /// A stop request arrived before the bound was reached.
    Interrupted,
    /// The log sink failed while appending a line.
    SinkFailure,
}

/// Result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// The reason the run ended.
    pub end_reason: RunEndReason,
    /// Number of iterations whose line reached the sink.
    pub iterations_run: u64,
}

/// Callback invoked with each rendered line after it reaches the sink.
///
/// The engine mirrors lines to standard output through this seam; tests
/// substitute a collector. The callback receives the exact text that was
/// appended to the file.
pub trait IterationCallback: Send {
    /// Called once per iteration with the rendered line and the 1-based
    /// loop counter.
    fn on_line(&mut self, line: &str, counter: u64);
}

/// A no-op iteration callback for testing.
pub struct NoOpCallback;

impl IterationCallback for NoOpCallback {
    fn on_line(&mut self, _line: &str, _counter: u64) {}
}

/// Run the logging loop until the iteration bound, a stop request, or a
/// sink failure ends it.
///
/// # Arguments
///
/// * `config` - Resolved run configuration (message, bound, interval)
/// * `sink` - The opened append-mode log sink
/// * `control` - Shared stop flag set by the interruption source
/// * `callback` - Receives each line for mirroring
///
/// # Returns
///
/// Returns a [`RunOutcome`] describing why the run ended and how many
/// lines reached the sink. Sink write failures are reported as
/// diagnostics and encoded in the outcome rather than propagated.
pub async fn run_loop(
    config: &RunConfig,
    sink: &mut LogSink,
    control: &Arc<ControlState>,
    callback: &mut dyn IterationCallback,
) -> RunOutcome {
    let bound = iteration_bound(config.iterations);
    let interval = Duration::from_millis(config.tick_interval_ms);
    let mut iterations_run: u64 = 0;

    info!(
        iterations = bound,
        tick_interval_ms = config.tick_interval_ms,
        "Run starting"
    );

    for counter in 1..=bound {
        // --- Check stop request (iteration boundary) ---
        if control.is_stop_requested() {
            info!(counter, "Stop requested, ending run early");
            return RunOutcome {
                end_reason: RunEndReason::Interrupted,
                iterations_run,
            };
        }

        // --- Render and append ---
        let line = LogEntry::now(counter, &config.message).to_line();

        if let Err(e) = sink.write_line(&line) {
            error!(error = %e, counter, "Log sink write failed, ending run");
            return RunOutcome {
                end_reason: RunEndReason::SinkFailure,
                iterations_run,
            };
        }
        iterations_run = iterations_run.saturating_add(1);

        // --- Mirror ---
        callback.on_line(&line, counter);

        // --- Pause for the tick interval ---
        if control.pause(interval).await == PauseOutcome::Interrupted {
            info!(counter, "Stop requested during pause, ending run early");
            return RunOutcome {
                end_reason: RunEndReason::Interrupted,
                iterations_run,
            };
        }
    }

    RunOutcome {
        end_reason: RunEndReason::IterationsCompleted,
        iterations_run,
    }
}

/// Log the run end summary.
///
/// This should be called after [`run_loop`] returns, before the process
/// prints its completion line.
pub fn log_run_end(outcome: &RunOutcome) {
    info!(
        end_reason = ?outcome.end_reason,
        iterations_run = outcome.iterations_run,
        "Run ended"
    );

    if outcome.iterations_run == 0 {
        warn!("Run ended with no iterations executed");
    }
}

/// Clamp the configured iteration count to an executable bound.
///
/// Non-positive values mean zero loop executions; the configuration
/// still resolves without error.
fn iteration_bound(iterations: i64) -> u64 {
    u64::try_from(iterations).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_config(iterations: i64, log_path: std::path::PathBuf) -> RunConfig {
        RunConfig {
            message: "test message".to_owned(),
            iterations,
            log_path,
            tick_interval_ms: 0,
        }
    }

    fn open_sink(dir: &tempfile::TempDir) -> LogSink {
        LogSink::open(&dir.path().join("app.log")).unwrap()
    }

    #[test]
    fn non_positive_bounds_clamp_to_zero() {
        assert_eq!(iteration_bound(0), 0);
        assert_eq!(iteration_bound(-3), 0);
        assert_eq!(iteration_bound(i64::MIN), 0);
        assert_eq!(iteration_bound(5), 5);
    }

    #[tokio::test]
    async fn bounded_by_iteration_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = make_config(5, dir.path().join("app.log"));
        let mut sink = open_sink(&dir);
        let control = Arc::new(ControlState::new());
        let mut cb = NoOpCallback;

        let outcome = run_loop(&config, &mut sink, &control, &mut cb).await;

        assert_eq!(outcome.end_reason, RunEndReason::IterationsCompleted);
        assert_eq!(outcome.iterations_run, 5);
    }

    #[tokio::test]
    async fn zero_iterations_complete_without_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = make_config(0, dir.path().join("app.log"));
        let mut sink = open_sink(&dir);
        let control = Arc::new(ControlState::new());
        let mut cb = NoOpCallback;

        let outcome = run_loop(&config, &mut sink, &control, &mut cb).await;

        assert_eq!(outcome.end_reason, RunEndReason::IterationsCompleted);
        assert_eq!(outcome.iterations_run, 0);
    }

    #[tokio::test]
    async fn stop_before_first_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let config = make_config(100, dir.path().join("app.log"));
        let mut sink = open_sink(&dir);
        let control = Arc::new(ControlState::new());
        control.request_stop();
        let mut cb = NoOpCallback;

        let outcome = run_loop(&config, &mut sink, &control, &mut cb).await;

        assert_eq!(outcome.end_reason, RunEndReason::Interrupted);
        assert_eq!(outcome.iterations_run, 0);
    }

    #[tokio::test]
    async fn iteration_callback_is_called() {
        struct CountCallback {
            count: u64,
        }
        impl IterationCallback for CountCallback {
            fn on_line(&mut self, _line: &str, _counter: u64) {
                self.count = self.count.saturating_add(1);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = make_config(3, dir.path().join("app.log"));
        let mut sink = open_sink(&dir);
        let control = Arc::new(ControlState::new());
        let mut cb = CountCallback { count: 0 };

        let _ = run_loop(&config, &mut sink, &control, &mut cb).await;

        assert_eq!(cb.count, 3);
    }

    #[tokio::test]
    async fn callback_receives_counters_from_one() {
        struct CounterCallback {
            counters: Vec<u64>,
        }
        impl IterationCallback for CounterCallback {
            fn on_line(&mut self, _line: &str, counter: u64) {
                self.counters.push(counter);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = make_config(4, dir.path().join("app.log"));
        let mut sink = open_sink(&dir);
        let control = Arc::new(ControlState::new());
        let mut cb = CounterCallback {
            counters: Vec::new(),
        };

        let _ = run_loop(&config, &mut sink, &control, &mut cb).await;

        assert_eq!(cb.counters, vec![1, 2, 3, 4]);
    }
}
