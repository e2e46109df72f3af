//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// A Prometheus exporter for Ring devices.
#[derive(Debug, Parser)]
#[command(name = "ring-exporter")]
#[command(about = "A Prometheus exporter for Ring devices")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long = "config.file", global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Initialize (or reinitialize) for background usage
    Init,
    /// Test the configuration and token
    Test,
    /// Execute monitoring and exposition of metrics
    Monitor,
}

/// Parse command-line arguments.
///
/// The first item is the program name, as with `std::env::args()`.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = parse_args(["ring-exporter", "monitor"]).unwrap();
        assert_eq!(cli.command, CliCommand::Monitor);
        assert_eq!(cli.config_file, PathBuf::from("ring-config.json"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_config_file_after_subcommand() {
        let cli =
            parse_args(["ring-exporter", "init", "--config.file", "/etc/ring/config.json"]).unwrap();
        assert_eq!(cli.command, CliCommand::Init);
        assert_eq!(cli.config_file, PathBuf::from("/etc/ring/config.json"));
    }

    #[test]
    fn test_parse_verbose_before_subcommand() {
        let cli = parse_args(["ring-exporter", "-v", "test"]).unwrap();
        assert_eq!(cli.command, CliCommand::Test);
        assert!(cli.verbose);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(parse_args(["ring-exporter"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_is_error() {
        assert!(parse_args(["ring-exporter", "serve"]).is_err());
    }
}
