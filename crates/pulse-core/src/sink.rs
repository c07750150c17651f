//! Append-mode file sink for log lines.
//!
//! The sink is the run's one external resource. It is opened once before
//! the loop starts, owned exclusively by the run for its lifetime, and
//! released when dropped -- on normal completion, early interruption, and
//! write failure alike. Every appended line is flushed before the call
//! returns, so a line is durable before the pause that follows it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Errors raised by the log sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The log file could not be opened or created.
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// The path that failed to open.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A line could not be appended or flushed.
    #[error("failed to append to log file: {source}")]
    Write {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Append-mode, flushed-per-line file sink.
///
/// Opening creates the file when absent and never truncates existing
/// content, so consecutive runs accumulate lines.
#[derive(Debug)]
pub struct LogSink {
    writer: BufWriter<File>,
}

impl LogSink {
    /// Open the sink at `path` in append mode, creating the file if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] when the file cannot be opened or
    /// created.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one line (a trailing newline is added) and flush it before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Write`] when the append or the flush fails.
    pub fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
