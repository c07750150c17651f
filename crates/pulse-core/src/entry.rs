//! Log entry composition and rendering.
//!
//! A log entry is a derived value, never stored: the wall-clock capture
//! time, the 1-based loop counter, and the configured message. The
//! rendered form is the single line format shared by the file sink and
//! the standard-output mirror:
//!
//! ```text
//! [2026-08-07 14:03:21] Loop 4: Default log message
//! ```

use chrono::{DateTime, Local};

/// Timestamp format used in rendered lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single timestamped log entry for one loop iteration.
///
/// Borrows the configured message; the entry lives only long enough to
/// be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    /// Wall-clock capture time, local timezone.
    timestamp: DateTime<Local>,

    /// 1-based loop counter.
    counter: u64,

    /// The configured message.
    message: &'a str,
}

impl<'a> LogEntry<'a> {
    /// Capture an entry for iteration `counter` at the current wall-clock
    /// time.
    pub fn now(counter: u64, message: &'a str) -> Self {
        Self {
            timestamp: Local::now(),
            counter,
            message,
        }
    }

    /// Build an entry from explicit parts (useful for testing the
    /// rendered format deterministically).
    pub const fn from_parts(timestamp: DateTime<Local>, counter: u64, message: &'a str) -> Self {
        Self {
            timestamp,
            counter,
            message,
        }
    }

    /// Render the entry as its single-line on-disk form, without a
    /// trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] Loop {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.counter,
            self.message
        )
    }
}
