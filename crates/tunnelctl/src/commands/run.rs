//! `run` handler.
//!
//! Resolves the tunnel and its credentials, then hands both to the
//! connector program. The connector's exit status becomes ours.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tunnelctl_core::{CoreError, read_credentials};

use crate::cli::RunArgs;
use crate::config::Settings;
use crate::error::CliError;

use super::util;

pub async fn handle(args: RunArgs, settings: &Settings) -> Result<(), CliError> {
    util::check_arity(
        "run",
        args.tunnels.len(),
        0,
        Some(1),
        "\"tunnelctl run\" accepts only one argument, the ID or name of the tunnel to run.",
    )?;
    let tunnel_ref = args
        .tunnels
        .first()
        .cloned()
        .or_else(|| settings.tunnel.clone())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            CliError::usage(
                "run",
                "\"tunnelctl run\" requires the ID or name of the tunnel to run as the last \
                 command line argument or in the configuration file.",
            )
        })?;

    if settings.hostname.as_deref().is_some_and(|h| !h.is_empty()) {
        warn!(
            "The property `hostname` in your configuration is ignored because you configured a \
             named tunnel in the property `tunnel` to run. Make sure to provision the routing \
             (e.g. via `tunnelctl route dns/lb`) or else your origin will not be reachable. You \
             should remove the `hostname` property to avoid this warning."
        );
    }

    let inventory = settings.inventory()?;
    let id = inventory.find_id(&tunnel_ref).await?;
    let credentials_path = settings
        .credentials_location(args.credentials_file.clone())
        .path_for(&id);
    check_credentials(&credentials_path, id)?;

    info!(tunnel_id = %id, "Starting tunnel");
    let argv = connector_args(id, &credentials_path, &args);
    debug!(program = %settings.connector_program, ?argv, "spawning connector");

    let status = Command::new(&settings.connector_program)
        .args(&argv)
        .status()
        .await
        .map_err(|source| CliError::ConnectorSpawn {
            program: settings.connector_program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::ConnectorExit {
            code: status.code().unwrap_or(1),
        })
    }
}

fn check_credentials(path: &Path, id: Uuid) -> Result<(), CliError> {
    let creds = read_credentials(path)?;
    if creds.tunnel_id != id {
        return Err(CoreError::InvalidCredentials {
            path: path.to_path_buf(),
            message: format!("credentials are for tunnel {}, not {id}", creds.tunnel_id),
        }
        .into());
    }
    Ok(())
}

/// Arguments passed to the connector program.
fn connector_args(id: Uuid, credentials_path: &Path, args: &RunArgs) -> Vec<String> {
    let mut argv = vec![
        "run".to_owned(),
        "--tunnel-id".to_owned(),
        id.to_string(),
        "--credentials-file".to_owned(),
        credentials_path.display().to_string(),
        "--protocol".to_owned(),
        args.protocol.clone(),
    ];
    if !args.features.is_empty() {
        argv.push("--features".to_owned());
        argv.push(args.features.join(","));
    }
    if args.force {
        argv.push("--force".to_owned());
    }
    argv
}
