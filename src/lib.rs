//! logmon - Runtime Log-Event Monitoring Library
//!
//! Attaches to a logging pipeline, observes every dispatched event, and
//! accumulates those at or above a configurable severity threshold so that
//! callers can fail an operation when unexpected warnings or errors were
//! logged during it.

pub mod cli;
pub mod constants;
pub mod models;
pub mod monitor;
pub mod output;
pub mod pipeline;
