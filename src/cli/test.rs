//! `ring-exporter test`: check that the stored token works.

use std::path::Path;

use crate::api::Session;
use crate::auth::open_authorized_session;
use crate::config::{load_config, state_file_for};
use crate::error::{ExporterResult, ResultExt};
use crate::ledger::Ledger;
use crate::traits::DeviceApi;

/// Handle the `test` command.
///
/// Never prompts: without a stored token this fails and asks for `init`.
pub async fn handle_test_command(config_path: &Path) -> ExporterResult<()> {
    let config = load_config(config_path).context("load config")?;
    let ledger = Ledger::load(state_file_for(config_path));

    let session = open_authorized_session(&config.api_config, &ledger, None)
        .await
        .context("open session")?;

    report(&session).await
}

/// Greet the account owner and list devices with their history sizes.
pub async fn report(session: &Session) -> ExporterResult<()> {
    let info = session
        .get_session_info()
        .await
        .context("obtain session info")?;
    println!(
        "Ready to work with your bells, {} {}",
        info.profile.first_name, info.profile.last_name
    );

    let devices = session.get_devices().await.context("list devices")?;
    for doorbot in &devices.doorbots {
        match session.get_doorbot_history(doorbot.id).await {
            Ok(events) => println!(
                "  doorbot {} ({}): {} recent events",
                doorbot.description,
                doorbot.id,
                events.len()
            ),
            Err(e) => println!(
                "  doorbot {} ({}): history unavailable: {}",
                doorbot.description, doorbot.id, e
            ),
        }
    }
    for camera in &devices.stickup_cams {
        println!("  camera {} ({})", camera.description, camera.id);
    }
    for chime in &devices.chimes {
        println!("  chime {} ({})", chime.description, chime.id);
    }
    Ok(())
}
