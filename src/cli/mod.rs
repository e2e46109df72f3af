//! CLI module for the exporter.
//!
//! - Argument parsing ([`args`])
//! - `init`: interactive token grant
//! - `test`: token and API check
//! - `monitor`: polling and metrics exposition
//!
//! # Usage
//!
//! ```ignore
//! use ring_exporter::cli::{parse_args, run_cli_command};
//!
//! let cli = parse_args(std::env::args())?;
//! run_cli_command(&cli).await?;
//! ```

pub mod args;
pub mod init;
pub mod monitor;
pub mod test;

pub use args::{parse_args, Cli, CliCommand};
pub use init::handle_init_command;
pub use monitor::handle_monitor_command;
pub use test::handle_test_command;

use crate::error::ExporterResult;

/// Run the parsed command.
pub async fn run_cli_command(cli: &Cli) -> ExporterResult<()> {
    match cli.command {
        CliCommand::Init => handle_init_command(&cli.config_file).await,
        CliCommand::Test => handle_test_command(&cli.config_file).await,
        CliCommand::Monitor => handle_monitor_command(&cli.config_file).await,
    }
}
