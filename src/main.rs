use ring_exporter::cli::{parse_args, run_cli_command};

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.verbose);

    if let Err(e) = run_cli_command(&cli).await {
        tracing::error!(code = e.error_code(), category = %e.category(), "{}", e);
        eprintln!("Error: {}", e.user_message());
        eprintln!("Hint: {}", e.recovery_hint());
        std::process::exit(2);
    }

    Ok(())
}
