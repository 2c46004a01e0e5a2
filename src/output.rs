//! Output formatting module
//!
//! Handles:
//! - Human-readable rendering of captured log events
//! - JSON report output
//! - Consistent timestamp formatting across both modes

use crate::models::{LogEvent, Severity};
use anyhow::Result;
use serde::Serialize;

/// Canonical record for one captured event in output.
/// Built through `create_event_record` so field names and timestamp format
/// stay consistent across all code paths.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedEventRecord {
    /// RFC 3339 timestamp of the event
    pub timestamp: String,
    /// Severity level name
    pub severity: Severity,
    /// Origin identifier
    pub target: String,
    /// Formatted message
    pub message: String,
}

/// Complete report structure for JSON serialization
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReport {
    /// Number of captured events
    pub captured: usize,
    /// The captured events, insertion-ordered
    pub events: Vec<CapturedEventRecord>,
}

/// Build the canonical output record for a captured event.
pub fn create_event_record(event: &LogEvent) -> CapturedEventRecord {
    CapturedEventRecord {
        timestamp: event.timestamp.to_rfc3339(),
        severity: event.severity,
        target: event.target.clone(),
        message: event.message.clone(),
    }
}

/// Format one captured event as human-readable text.
pub fn format_event_human(record: &CapturedEventRecord) -> String {
    format!("[{}] {}", record.severity, record.message)
}

/// Format a captured-events report as human-readable text.
pub fn format_report_human(events: &[LogEvent]) -> String {
    let mut out = String::from("Captured log events:\n");
    for event in events {
        out.push_str(&format_event_human(&create_event_record(event)));
        out.push('\n');
    }
    out
}

/// Format a captured-events report as a JSON document.
pub fn format_report_json(events: &[LogEvent]) -> Result<String> {
    let report = CaptureReport {
        captured: events.len(),
        events: events.iter().map(create_event_record).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
