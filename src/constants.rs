//! Global constants for logmon
//!
//! Centralized location for application-wide constants

/// Stable name the monitor registers its interceptor under.
/// Registration is replace-by-name, so re-starting a monitor with this name
/// never accumulates duplicate interceptors.
pub const INTERCEPTOR_NAME: &str = "monitor-interceptor";

/// Default pipeline channel the monitor attaches to
pub const ROOT_CHANNEL: &str = "root";

/// Default capture threshold (inclusive: events at or above qualify)
pub const DEFAULT_THRESHOLD: &str = "WARN";
