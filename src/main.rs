#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use std::sync::Arc;

use logmon::cli;
use logmon::constants::ROOT_CHANNEL;
use logmon::models::Severity;
use logmon::monitor::LogMonitor;
use logmon::output;
use logmon::pipeline::{logger::PipelineLogger, Pipeline};

fn main() -> Result<()> {
    let config = cli::parse_args()?;

    let pipeline = Arc::new(Pipeline::new());
    if config.monitor.channel != ROOT_CHANNEL {
        pipeline.add_channel(&config.monitor.channel, Severity::Trace);
    }

    let mut monitor = LogMonitor::new(Arc::clone(&pipeline));
    monitor.start(&config.monitor)?;

    // Route the `log` facade through the monitored channel
    PipelineLogger::new(Arc::clone(&pipeline), config.monitor.channel.clone())
        .install()
        .context("Failed to install pipeline logger")?;

    // Sample producers
    log::error!("Error message 1");
    log::warn!("Warning message 1");
    log::info!("Info message 1");

    let outcome = monitor.check();
    monitor.stop()?;

    match outcome {
        Ok(()) => {
            if !config.quiet_mode {
                println!(
                    "No log events at or above {} were captured.",
                    config.monitor.threshold.to_uppercase()
                );
            }
            Ok(())
        }
        Err(captured) => {
            if config.json_output {
                println!("{}", output::format_report_json(&captured.events)?);
            } else {
                print!("{}", output::format_report_human(&captured.events));
            }
            std::process::exit(1);
        }
    }
}
