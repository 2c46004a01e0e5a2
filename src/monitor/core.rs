//! Core monitor lifecycle
//!
//! Provides the start/stop/check/drain surface over one capture session.

use crate::models::{CapturedEvents, LogEvent, MonitorConfig, MonitorError, Severity};
use crate::monitor::interceptor::{CaptureBuffer, CaptureInterceptor};
use crate::pipeline::{Interceptor, Pipeline};
use std::sync::{Arc, Mutex};

/// Runtime log-event monitor.
///
/// While a session is active, every event dispatched on the configured
/// channel at or above the session threshold accumulates in the capture
/// buffer. `check` turns "something was logged above severity X" into a
/// failable condition; `stop` keeps the buffer queryable for post-mortem
/// inspection, and a fresh `start` discards it.
pub struct LogMonitor {
    pipeline: Arc<Pipeline>,
    buffer: CaptureBuffer,
    active: Option<ActiveSession>,
}

/// Registration details of the currently installed interceptor.
struct ActiveSession {
    channel: String,
    name: String,
    interceptor: Arc<CaptureInterceptor>,
}

impl LogMonitor {
    /// Create an uninstalled monitor bound to a pipeline.
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            buffer: Arc::new(Mutex::new(Vec::new())),
            active: None,
        }
    }

    /// Whether a capture session is currently installed.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a capture session.
    ///
    /// Validates the configured threshold, replaces any session this monitor
    /// already had, and registers a fresh interceptor under the configured
    /// name with remove-then-add semantics, so repeated starts never stack
    /// duplicate registrations. On any failure the monitor is left
    /// uninstalled, never half-registered.
    pub fn start(&mut self, config: &MonitorConfig) -> Result<(), MonitorError> {
        let threshold: Severity = config.threshold.parse()?;
        self.stop()?;

        let buffer: CaptureBuffer = Arc::new(Mutex::new(Vec::new()));
        let interceptor = Arc::new(CaptureInterceptor::new(Arc::clone(&buffer), threshold));

        self.pipeline
            .remove_interceptor(&config.channel, &config.interceptor_name)?;
        self.pipeline.add_interceptor(
            &config.channel,
            &config.interceptor_name,
            interceptor.clone(),
        )?;
        if let Err(err) = self.pipeline.apply_configuration(&config.channel) {
            // Roll back the staged registration; best effort, the channel
            // just failed to apply.
            let _ = self
                .pipeline
                .remove_interceptor(&config.channel, &config.interceptor_name);
            return Err(err.into());
        }

        self.buffer = buffer;
        self.active = Some(ActiveSession {
            channel: config.channel.clone(),
            name: config.interceptor_name.clone(),
            interceptor,
        });
        Ok(())
    }

    /// End the active capture session.
    ///
    /// Removes the interceptor from the pipeline and marks it released so a
    /// stale handle cannot keep capturing. The buffer is NOT cleared:
    /// captured events stay queryable after `stop`. Calling `stop` while
    /// uninstalled is a no-op.
    pub fn stop(&mut self) -> Result<(), MonitorError> {
        let Some(session) = self.active.take() else {
            return Ok(());
        };
        let result = self
            .pipeline
            .remove_interceptor(&session.channel, &session.name)
            .and_then(|()| self.pipeline.apply_configuration(&session.channel));
        // Whatever the pipeline said, the handle must stop capturing.
        session.interceptor.release();
        result.map_err(MonitorError::from)
    }

    /// Fail if any qualifying event has been captured.
    ///
    /// Returns `Ok(())` when the buffer is empty. Otherwise returns a
    /// [`CapturedEvents`] failure carrying a snapshot of the buffer at call
    /// time; later captures do not retroactively change a returned
    /// snapshot. The buffer itself is left untouched, so repeated calls see
    /// the same or a superset of the events.
    pub fn check(&self) -> Result<(), CapturedEvents> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.is_empty() {
            Ok(())
        } else {
            Err(CapturedEvents {
                events: buffer.clone(),
            })
        }
    }

    /// Take all captured events without failing, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<LogEvent> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ROOT_CHANNEL;

    fn monitor() -> (Arc<Pipeline>, LogMonitor) {
        let pipeline = Arc::new(Pipeline::new());
        let monitor = LogMonitor::new(Arc::clone(&pipeline));
        (pipeline, monitor)
    }

    fn emit(pipeline: &Pipeline, severity: Severity, message: &str) {
        pipeline
            .emit(ROOT_CHANNEL, LogEvent::new(severity, "test", message))
            .unwrap();
    }

    fn config(threshold: &str) -> MonitorConfig {
        MonitorConfig {
            threshold: threshold.to_string(),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_check_passes_when_nothing_qualifies() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("ERROR")).unwrap();
        emit(&pipeline, Severity::Info, "info");
        emit(&pipeline, Severity::Warn, "warn");
        assert!(monitor.check().is_ok());
        monitor.stop().unwrap();
    }

    #[test]
    fn test_check_fails_with_qualifying_events_in_order() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "Error message 1");
        emit(&pipeline, Severity::Warn, "Warning message 1");
        emit(&pipeline, Severity::Info, "Info message 1");

        let failure = monitor.check().unwrap_err();
        let messages: Vec<&str> = failure.events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Error message 1", "Warning message 1"]);
        monitor.stop().unwrap();
    }

    #[test]
    fn test_check_is_idempotent_between_captures() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "boom");

        let first = monitor.check().unwrap_err();
        let second = monitor.check().unwrap_err();
        assert_eq!(first.events, second.events);
        monitor.stop().unwrap();
    }

    #[test]
    fn test_snapshot_is_not_a_live_view() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "first");

        let snapshot = monitor.check().unwrap_err();
        emit(&pipeline, Severity::Error, "second");

        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(monitor.check().unwrap_err().events.len(), 2);
        monitor.stop().unwrap();
    }

    #[test]
    fn test_invalid_threshold_prevents_activation() {
        let (_pipeline, mut monitor) = monitor();
        let err = monitor.start(&config("SHOUTING")).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidThreshold(_)));
        assert!(!monitor.is_active());
    }

    #[test]
    fn test_unknown_channel_leaves_monitor_uninstalled() {
        let (_pipeline, mut monitor) = monitor();
        let bad = MonitorConfig {
            channel: "missing".to_string(),
            ..MonitorConfig::default()
        };
        let err = monitor.start(&bad).unwrap_err();
        assert!(matches!(err, MonitorError::Registration(_)));
        assert!(!monitor.is_active());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (_pipeline, mut monitor) = monitor();
        assert!(monitor.stop().is_ok());
        assert!(monitor.stop().is_ok());
    }

    #[test]
    fn test_buffer_survives_stop_for_post_mortem() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "kept");
        monitor.stop().unwrap();

        let failure = monitor.check().unwrap_err();
        assert_eq!(failure.events[0].message, "kept");
    }

    #[test]
    fn test_events_after_stop_are_not_captured() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        monitor.stop().unwrap();
        emit(&pipeline, Severity::Fatal, "too late");
        assert!(monitor.check().is_ok());
    }

    #[test]
    fn test_fresh_start_discards_previous_session_buffer() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "old session");
        monitor.stop().unwrap();

        monitor.start(&config("WARN")).unwrap();
        assert!(monitor.check().is_ok(), "prior session buffer must not be visible");
        monitor.stop().unwrap();
    }

    #[test]
    fn test_double_start_does_not_duplicate_capture() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        monitor.start(&config("WARN")).unwrap();
        assert_eq!(pipeline.active_interceptor_count(ROOT_CHANNEL).unwrap(), 1);

        emit(&pipeline, Severity::Error, "once");
        let failure = monitor.check().unwrap_err();
        assert_eq!(failure.events.len(), 1);
        monitor.stop().unwrap();
    }

    #[test]
    fn test_drain_empties_buffer_without_failing() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "drained");

        let drained = monitor.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "drained");
        assert!(monitor.check().is_ok());
        monitor.stop().unwrap();
    }

    #[test]
    fn test_capture_continues_after_drain() {
        let (pipeline, mut monitor) = monitor();
        monitor.start(&config("WARN")).unwrap();
        emit(&pipeline, Severity::Error, "before");
        monitor.drain();
        emit(&pipeline, Severity::Error, "after");

        let failure = monitor.check().unwrap_err();
        assert_eq!(failure.events.len(), 1);
        assert_eq!(failure.events[0].message, "after");
        monitor.stop().unwrap();
    }

    #[test]
    fn test_two_monitors_coexist_under_distinct_names() {
        let pipeline = Arc::new(Pipeline::new());
        let mut errors_only = LogMonitor::new(Arc::clone(&pipeline));
        let mut warns_too = LogMonitor::new(Arc::clone(&pipeline));

        let mut error_config = config("ERROR");
        error_config.interceptor_name = "errors-only".to_string();
        let mut warn_config = config("WARN");
        warn_config.interceptor_name = "warns-too".to_string();

        errors_only.start(&error_config).unwrap();
        warns_too.start(&warn_config).unwrap();
        emit(&pipeline, Severity::Warn, "just a warning");

        assert!(errors_only.check().is_ok());
        assert_eq!(warns_too.check().unwrap_err().events.len(), 1);

        errors_only.stop().unwrap();
        warns_too.stop().unwrap();
    }
}
