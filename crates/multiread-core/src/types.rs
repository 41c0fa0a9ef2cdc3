//! Core types for multiread

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single structured log entry, one JSON object per record
///
/// ```json
/// {"level":"info","date":"2024-03-01T09:30:00Z","msg":"service started"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity label as written by the producer (e.g. "info", "error")
    pub level: String,

    /// Timestamp (RFC 3339)
    pub date: DateTime<Utc>,

    /// Message text
    pub msg: String,
}

impl LogRecord {
    /// Create a new log record
    pub fn new(level: impl Into<String>, date: DateTime<Utc>, msg: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            date,
            msg: msg.into(),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} {}",
            self.date.to_rfc3339(),
            self.level.to_uppercase(),
            self.msg
        )
    }
}
