//! `route` handler.

use tracing::info;

use tunnelctl_core::{CoreError, RouteCommand};

use crate::cli::{GlobalOpts, RouteArgs};
use crate::config::Settings;
use crate::error::CliError;

pub async fn handle(
    args: RouteArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Validate the whole directive before any remote call.
    let RouteCommand { tunnel, route } =
        RouteCommand::parse(&args.args, args.overwrite_dns).map_err(|e| match e {
            CoreError::Usage { message } => CliError::usage("route", message),
            other => other.into(),
        })?;

    let inventory = settings.inventory()?;
    let id = inventory.find_id(&tunnel).await?;
    let result = inventory.route(id, &route).await?;

    let summary = result.success_summary();
    info!(tunnel_id = %id, "{summary}");
    if !global.quiet {
        eprintln!("{summary}");
    }
    Ok(())
}
