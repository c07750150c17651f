//! Error types for the pulse daemon binary.
//!
//! [`EngineError`] wraps the failure modes of the fallible part of the
//! run so it can be propagated with `?` and reported in one place. The
//! engine never lets these escalate to a non-zero exit: failures are
//! written to standard error and the process still finishes normally.

/// Top-level error for the daemon binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The log sink could not be opened.
    #[error("sink error: {source}")]
    Sink {
        /// The underlying sink error.
        #[from]
        source: pulse_core::sink::SinkError,
    },
}
