//! CLI argument parsing and validation module
//!
//! Handles the demonstration driver's command-line interface using clap:
//! - Severity threshold selection
//! - Pipeline channel selection
//! - Output format selection (human/JSON)
//! - Quiet mode, help and version commands

use crate::constants::{DEFAULT_THRESHOLD, ROOT_CHANNEL};
use crate::models::{MonitorConfig, Severity};
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

/// Configuration for one demonstration run
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Monitor session settings
    pub monitor: MonitorConfig,
    /// Whether to output JSON format
    pub json_output: bool,
    /// Whether to suppress the all-clear message
    pub quiet_mode: bool,
}

fn command() -> Command {
    Command::new("logmon")
        .version(env!("LOGMON_VERSION"))
        .about("Monitor a logging pipeline for events at or above a severity threshold")
        .long_about(
            "Installs a capture interceptor into the logging pipeline, emits sample log \
             events, and fails with a report when any event at or above the threshold \
             was observed.",
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("LEVEL")
                .help("Capture threshold severity (TRACE, DEBUG, INFO, WARN, ERROR, FATAL)")
                .default_value(DEFAULT_THRESHOLD),
        )
        .arg(
            Arg::new("channel")
                .short('c')
                .long("channel")
                .value_name("CHANNEL")
                .help("Pipeline channel to monitor")
                .default_value(ROOT_CHANNEL),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output the capture report in JSON format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress the all-clear message when nothing was captured")
                .action(ArgAction::SetTrue),
        )
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<DemoConfig> {
    config_from(command().get_matches())
}

fn config_from(matches: ArgMatches) -> Result<DemoConfig> {
    // Validate the threshold eagerly so a typo fails before the pipeline is
    // touched; start() re-validates per session.
    let threshold = matches
        .get_one::<String>("threshold")
        .expect("defaulted")
        .clone();
    threshold.parse::<Severity>()?;

    let channel = matches
        .get_one::<String>("channel")
        .expect("defaulted")
        .clone();

    let monitor = MonitorConfig {
        channel,
        threshold,
        ..MonitorConfig::default()
    };

    Ok(DemoConfig {
        monitor,
        json_output: matches.get_flag("json"),
        quiet_mode: matches.get_flag("quiet"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DemoConfig> {
        config_from(command().try_get_matches_from(args.iter().copied())?)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["logmon"]).unwrap();
        assert_eq!(config.monitor.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.monitor.channel, ROOT_CHANNEL);
        assert!(!config.json_output);
        assert!(!config.quiet_mode);
    }

    #[test]
    fn test_threshold_and_flags() {
        let config = parse(&["logmon", "-t", "error", "--json", "-q"]).unwrap();
        assert_eq!(config.monitor.threshold, "error");
        assert!(config.json_output);
        assert!(config.quiet_mode);
    }

    #[test]
    fn test_unknown_threshold_is_rejected() {
        let err = parse(&["logmon", "--threshold", "LOUD"]).unwrap_err();
        assert!(err.to_string().contains("LOUD"));
    }

    #[test]
    fn test_custom_channel() {
        let config = parse(&["logmon", "--channel", "app"]).unwrap();
        assert_eq!(config.monitor.channel, "app");
    }
}
