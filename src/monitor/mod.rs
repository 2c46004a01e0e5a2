//! Log event monitoring
//!
//! The monitor installs a capture interceptor into the pipeline and exposes
//! the start/stop/check/drain session lifecycle.

pub mod core;
mod interceptor;

pub use self::core::LogMonitor;
