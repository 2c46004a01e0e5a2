//! Bridge from the `log` facade into the pipeline
//!
//! Lets ordinary `log::error!` / `log::warn!` producers feed a pipeline
//! channel without knowing about it.

use crate::models::{LogEvent, Severity};
use crate::pipeline::Pipeline;
use log::{Log, Metadata, Record};
use std::sync::Arc;

/// `log::Log` backend that converts each record into a [`LogEvent`] and
/// emits it on one pipeline channel.
pub struct PipelineLogger {
    pipeline: Arc<Pipeline>,
    channel: String,
}

impl PipelineLogger {
    pub fn new(pipeline: Arc<Pipeline>, channel: impl Into<String>) -> Self {
        Self {
            pipeline,
            channel: channel.into(),
        }
    }

    /// Install this logger as the process-wide `log` backend. Level
    /// filtering is left to the pipeline's channels, so the facade passes
    /// everything through.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        log::set_max_level(log::LevelFilter::Trace);
        log::set_boxed_logger(Box::new(self))
    }
}

/// Map a `log` facade level onto the pipeline severity scale. The facade
/// has no level above Error, so Fatal is only reachable via direct emits.
pub fn severity_from_level(level: log::Level) -> Severity {
    match level {
        log::Level::Trace => Severity::Trace,
        log::Level::Debug => Severity::Debug,
        log::Level::Info => Severity::Info,
        log::Level::Warn => Severity::Warn,
        log::Level::Error => Severity::Error,
    }
}

impl Log for PipelineLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let event = LogEvent::new(
            severity_from_level(record.level()),
            record.target(),
            record.args().to_string(),
        );
        // An unknown channel means the logger outlived its pipeline wiring;
        // the record is dropped rather than panicking inside a log macro.
        let _ = self.pipeline.emit(&self.channel, event);
    }

    fn flush(&self) {}
}
