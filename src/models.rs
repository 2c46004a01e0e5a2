//! Data models module
//!
//! Defines core data structures:
//! - Severity: totally ordered log level classification
//! - LogEvent: immutable record of one dispatched log event
//! - MonitorConfig: per-session monitor settings
//! - MonitorError / CapturedEvents: monitor error surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_THRESHOLD, INTERCEPTOR_NAME, ROOT_CHANNEL};
use crate::pipeline::PipelineError;

/// Ordered log level classification. Comparisons use the declaration order
/// exclusively: Trace < Debug < Info < Warn < Error < Fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// All levels, least to most severe.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Uppercase name as used in configuration and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = MonitorError;

    /// Case-insensitive parse of a severity name. Unrecognized names are a
    /// configuration error, never silently defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" => Ok(Severity::Fatal),
            _ => Err(MonitorError::InvalidThreshold(s.to_string())),
        }
    }
}

/// A single dispatched log event as observed by the monitor.
///
/// Events are immutable once constructed; the capture buffer and `check`
/// snapshots hold owned, read-only copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
    /// Severity of the event
    pub severity: Severity,
    /// Origin identifier (module path, logger name, ...)
    pub target: String,
    /// Formatted message text
    pub message: String,
}

impl LogEvent {
    /// Build an event stamped with the current time.
    pub fn new(severity: Severity, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Configuration for one monitoring session, read once at `start()`.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Pipeline channel to attach to
    pub channel: String,
    /// Stable name the interceptor registers under
    pub interceptor_name: String,
    /// Severity name selecting the capture threshold (inclusive)
    pub threshold: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            channel: ROOT_CHANNEL.to_string(),
            interceptor_name: INTERCEPTOR_NAME.to_string(),
            threshold: DEFAULT_THRESHOLD.to_string(),
        }
    }
}

/// Custom error types for monitor lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The configured severity name does not map to a known level
    #[error("Unrecognized severity threshold: {0:?}. Expected one of TRACE, DEBUG, INFO, WARN, ERROR, FATAL")]
    InvalidThreshold(String),
    /// The host pipeline rejected an add/remove/apply request
    #[error("Pipeline registration failed: {0}")]
    Registration(#[from] PipelineError),
}

/// Deliberate failure signal from `check()`: one or more events at or above
/// the threshold were captured. Carries an immutable snapshot of the buffer
/// at call time, in emission order per producer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Captured {} log event(s) at or above the monitor threshold", .events.len())]
pub struct CapturedEvents {
    /// Snapshot of the captured buffer, insertion-ordered
    pub events: Vec<LogEvent>,
}
