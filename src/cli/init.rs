//! `ring-exporter init`: create a config if needed and authorize a token.

use std::path::Path;

use crate::adapters::CliAuthenticator;
use crate::auth::open_authorized_session;
use crate::config::{load_config, save_config, state_file_for, Config, ConfigError};
use crate::error::{ExporterResult, ResultExt};
use crate::ledger::Ledger;

/// Load the config at `path`, or write a default one when it cannot be loaded.
pub fn load_or_create_config(path: &Path) -> ExporterResult<Config> {
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Read { .. }) | Err(ConfigError::Parse { .. }) => {
            tracing::info!("Creating new config {}", path.display());
            let config = Config::with_defaults();
            save_config(path, &config).context("write default config")?;
            Ok(config)
        }
        Err(e) => Err(e).context("load config"),
    }
}

/// Handle the `init` command.
pub async fn handle_init_command(config_path: &Path) -> ExporterResult<()> {
    let config = load_or_create_config(config_path)?;
    let ledger = Ledger::load(state_file_for(config_path));
    let authenticator = CliAuthenticator::new();

    open_authorized_session(&config.api_config, &ledger, Some(&authenticator))
        .await
        .context("authorize new token")?;

    println!("Authorized. State is kept in {}", ledger.path().display());
    Ok(())
}
