//! Daemon binary for the pulse timed logging loop.
//!
//! Resolves a message and an iteration bound, then appends one
//! timestamped line per iteration to the log file while mirroring it to
//! standard output, pausing between iterations, until the bound is
//! reached or the process is interrupted.
//!
//! # Startup Sequence
//!
//! 1. Initialize diagnostics (tracing to standard error)
//! 2. Resolve configuration (`pulse-config.yaml` + environment overrides)
//! 3. Print the startup banner to standard output
//! 4. Install the Ctrl-C stop handler
//! 5. Open the log sink and run the loop
//! 6. Log the outcome and print the completion line
//!
//! The process exits with status 0 on every path, including sink
//! failures and interruption; failure details go to standard error.

mod error;

use std::path::Path;
use std::sync::Arc;

use pulse_core::config::RunConfig;
use pulse_core::control::ControlState;
use pulse_core::runner::{self, IterationCallback, RunOutcome};
use pulse_core::sink::LogSink;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Mirrors each appended line to standard output.
struct StdoutMirror;

impl IterationCallback for StdoutMirror {
    fn on_line(&mut self, line: &str, _counter: u64) {
        println!("{line}");
    }
}

/// Application entry point for the pulse daemon.
///
/// Initializes diagnostics, resolves configuration, wires the interrupt
/// handler, and drives the run loop. Never exits non-zero: failures are
/// reported to standard error and the completion line still prints.
#[tokio::main]
async fn main() {
    // 1. Diagnostics go to stderr; stdout carries only the banner, the
    //    mirrored lines, and the completion line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("pulse-engine starting");

    // 2. Resolve configuration.
    let config = load_config();
    info!(
        message = %config.message,
        iterations = config.iterations,
        log_path = %config.log_path.display(),
        tick_interval_ms = config.tick_interval_ms,
        "Configuration resolved"
    );

    // 3. Startup banner.
    println!("Starting pulse engine...");
    println!("Will run for {} iterations.", config.iterations);

    // 4. Ctrl-C requests a clean stop, observed at iteration boundaries
    //    and mid-pause.
    let control = Arc::new(ControlState::new());
    let signal_control = Arc::clone(&control);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping");
                signal_control.request_stop();
            }
            Err(e) => warn!(error = %e, "Failed to listen for interrupt signal"),
        }
    });

    // 5. Open the sink and run.
    match run(&config, &control).await {
        Ok(outcome) => runner::log_run_end(&outcome),
        Err(e) => error!(error = %e, "Run aborted"),
    }

    // 6. Completion line, on every path. Never written to the file.
    println!("Application finished.");
}

/// Open the log sink at the configured path and execute the run loop.
///
/// # Errors
///
/// Returns [`EngineError::Sink`] when the log file cannot be opened.
/// Write failures inside the loop are encoded in the returned
/// [`RunOutcome`] instead.
async fn run(config: &RunConfig, control: &Arc<ControlState>) -> Result<RunOutcome, EngineError> {
    let mut sink = LogSink::open(&config.log_path)?;
    info!(path = %config.log_path.display(), "Log sink opened");

    let mut mirror = StdoutMirror;
    Ok(runner::run_loop(config, &mut sink, control, &mut mirror).await)
}

/// Resolve the run configuration.
///
/// Loads `pulse-config.yaml` from the working directory when present. A
/// file that cannot be read or parsed logs a warning and resolves to
/// defaults. The `LOG_MESSAGE` and `ITERATIONS` environment overrides
/// are applied in every case.
fn load_config() -> RunConfig {
    let config_path = Path::new("pulse-config.yaml");
    if config_path.exists() {
        match RunConfig::from_file(config_path) {
            Ok(config) => return config,
            Err(e) => warn!(error = %e, "Config file unreadable, using defaults"),
        }
    } else {
        info!("Config file not found, using defaults");
    }

    let mut config = RunConfig::default();
    config.apply_env_overrides();
    config
}
