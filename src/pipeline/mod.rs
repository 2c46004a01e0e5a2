//! Host logging pipeline
//!
//! Routes every emitted log event to the interceptors registered on a named
//! channel. Interceptor changes are staged by `add_interceptor` /
//! `remove_interceptor` and only become visible to dispatch once
//! `apply_configuration` commits them, mirroring a reconfigurable logging
//! backend.

use crate::models::{LogEvent, Severity};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub mod logger;

/// A callback registered with the pipeline that observes dispatched events.
///
/// `on_event` runs on whatever thread the producer emitted from, possibly
/// concurrently with other producers. Implementations must not panic: a
/// misbehaving interceptor must not break logging for the rest of the
/// process.
pub trait Interceptor: Send + Sync {
    /// Called once per dispatched event.
    fn on_event(&self, event: &LogEvent);

    /// Called when the pipeline retires this interceptor from a channel's
    /// active set. Default is a no-op.
    fn release(&self) {}
}

/// Errors surfaced by pipeline registration and dispatch calls
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The named channel has not been created on this pipeline
    #[error("Unknown channel: {0:?}")]
    UnknownChannel(String),
}

/// One named dispatch channel with its own minimum-severity filter.
struct Channel {
    min_severity: Severity,
    /// Registrations staged since the last apply
    staged: Vec<(String, Arc<dyn Interceptor>)>,
    /// Set actually used by dispatch
    active: Vec<(String, Arc<dyn Interceptor>)>,
}

impl Channel {
    fn new(min_severity: Severity) -> Self {
        Self {
            min_severity,
            staged: Vec::new(),
            active: Vec::new(),
        }
    }
}

/// The host logging pipeline. Cheap to share via `Arc`; all methods take
/// `&self` and synchronize internally.
pub struct Pipeline {
    channels: RwLock<HashMap<String, Channel>>,
}

impl Pipeline {
    /// Create a pipeline with the root channel accepting all severities.
    pub fn new() -> Self {
        let mut channels = HashMap::new();
        channels.insert(
            crate::constants::ROOT_CHANNEL.to_string(),
            Channel::new(Severity::Trace),
        );
        Self {
            channels: RwLock::new(channels),
        }
    }

    /// Create an additional named channel. Replaces an existing channel of
    /// the same name, dropping its interceptor registrations.
    pub fn add_channel(&self, channel_id: &str, min_severity: Severity) {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        channels.insert(channel_id.to_string(), Channel::new(min_severity));
    }

    /// Stage an interceptor registration under `name`. Replaces any staged
    /// interceptor of the same name rather than adding a second one.
    pub fn add_interceptor(
        &self,
        channel_id: &str,
        name: &str,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<(), PipelineError> {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        let channel = channels
            .get_mut(channel_id)
            .ok_or_else(|| PipelineError::UnknownChannel(channel_id.to_string()))?;
        channel.staged.retain(|(staged_name, _)| staged_name != name);
        channel.staged.push((name.to_string(), interceptor));
        Ok(())
    }

    /// Stage removal of the interceptor registered under `name`. No-op when
    /// no such registration exists.
    pub fn remove_interceptor(&self, channel_id: &str, name: &str) -> Result<(), PipelineError> {
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        let channel = channels
            .get_mut(channel_id)
            .ok_or_else(|| PipelineError::UnknownChannel(channel_id.to_string()))?;
        channel.staged.retain(|(staged_name, _)| staged_name != name);
        Ok(())
    }

    /// Commit staged interceptor changes so future dispatches reflect them.
    /// Interceptors dropped from the active set are signalled via `release`.
    pub fn apply_configuration(&self, channel_id: &str) -> Result<(), PipelineError> {
        let retired = {
            let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
            let channel = channels
                .get_mut(channel_id)
                .ok_or_else(|| PipelineError::UnknownChannel(channel_id.to_string()))?;
            let staged = channel.staged.clone();
            let retired: Vec<Arc<dyn Interceptor>> = channel
                .active
                .iter()
                .filter(|(_, active)| {
                    !staged.iter().any(|(_, kept)| Arc::ptr_eq(active, kept))
                })
                .map(|(_, active)| Arc::clone(active))
                .collect();
            channel.active = staged;
            retired
        };
        // Release outside the lock; a release callback must not be able to
        // deadlock against a concurrent dispatch.
        for interceptor in retired {
            interceptor.release();
        }
        Ok(())
    }

    /// Dispatch one event on a channel. Events below the channel's minimum
    /// severity are not delivered to any interceptor. Delivery runs on the
    /// calling thread; there is no ordering guarantee across producers.
    pub fn emit(&self, channel_id: &str, event: LogEvent) -> Result<(), PipelineError> {
        let active = {
            let channels = self.channels.read().unwrap_or_else(|e| e.into_inner());
            let channel = channels
                .get(channel_id)
                .ok_or_else(|| PipelineError::UnknownChannel(channel_id.to_string()))?;
            if event.severity < channel.min_severity {
                return Ok(());
            }
            channel
                .active
                .iter()
                .map(|(_, interceptor)| Arc::clone(interceptor))
                .collect::<Vec<_>>()
        };
        for interceptor in active {
            interceptor.on_event(&event);
        }
        Ok(())
    }

    /// Number of interceptors currently in a channel's active set.
    pub fn active_interceptor_count(&self, channel_id: &str) -> Result<usize, PipelineError> {
        let channels = self.channels.read().unwrap_or_else(|e| e.into_inner());
        channels
            .get(channel_id)
            .map(|channel| channel.active.len())
            .ok_or_else(|| PipelineError::UnknownChannel(channel_id.to_string()))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
