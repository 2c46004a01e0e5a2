//! Capture interceptor registered with the pipeline by the monitor.

use crate::models::{LogEvent, Severity};
use crate::pipeline::Interceptor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared capture buffer, guarded by a single short-held lock.
pub(crate) type CaptureBuffer = Arc<Mutex<Vec<LogEvent>>>;

/// Appends every event at or above the threshold to the session buffer.
///
/// Runs on arbitrary producer threads and must never let a failure escape
/// back into the pipeline.
pub(crate) struct CaptureInterceptor {
    buffer: CaptureBuffer,
    threshold: Severity,
    released: AtomicBool,
}

impl CaptureInterceptor {
    pub(crate) fn new(buffer: CaptureBuffer, threshold: Severity) -> Self {
        Self {
            buffer,
            threshold,
            released: AtomicBool::new(false),
        }
    }
}

impl Interceptor for CaptureInterceptor {
    fn on_event(&self, event: &LogEvent) {
        if self.released.load(Ordering::Acquire) {
            return;
        }
        // Inclusive threshold: an event exactly at the threshold qualifies.
        if event.severity >= self.threshold {
            // A poisoned lock still holds a structurally sound Vec of plain
            // values; recover it and keep capturing.
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.push(event.clone());
        }
    }

    fn release(&self) {
        self.released.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(severity: Severity, message: &str) -> LogEvent {
        LogEvent::new(severity, "test", message)
    }

    fn interceptor(threshold: Severity) -> (CaptureInterceptor, CaptureBuffer) {
        let buffer: CaptureBuffer = Arc::new(Mutex::new(Vec::new()));
        (CaptureInterceptor::new(Arc::clone(&buffer), threshold), buffer)
    }

    #[test]
    fn test_event_at_threshold_is_captured() {
        let (capture, buffer) = interceptor(Severity::Warn);
        capture.on_event(&event(Severity::Warn, "at threshold"));
        assert_eq!(buffer.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_event_above_threshold_is_captured() {
        let (capture, buffer) = interceptor(Severity::Warn);
        capture.on_event(&event(Severity::Fatal, "above"));
        assert_eq!(buffer.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_event_below_threshold_leaves_no_trace() {
        let (capture, buffer) = interceptor(Severity::Warn);
        capture.on_event(&event(Severity::Info, "below"));
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[test]
    fn test_capture_preserves_emission_order() {
        let (capture, buffer) = interceptor(Severity::Trace);
        capture.on_event(&event(Severity::Error, "first"));
        capture.on_event(&event(Severity::Warn, "second"));
        let messages: Vec<String> = buffer
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_released_interceptor_ignores_events() {
        let (capture, buffer) = interceptor(Severity::Trace);
        capture.release();
        capture.on_event(&event(Severity::Fatal, "late delivery"));
        assert!(buffer.lock().unwrap().is_empty());
    }
}
