//! `cleanup` handler.

use crate::cli::{CleanupArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

use super::util;

pub async fn handle(
    args: CleanupArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::check_arity(
        "cleanup",
        args.tunnels.len(),
        1,
        None,
        "\"tunnelctl cleanup\" requires at least 1 argument, the IDs of the tunnels to cleanup connections.",
    )?;
    let connector_id = args
        .connector_id
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| util::parse_uuid(c, "connector ID"))
        .transpose()?;

    let inventory = settings.inventory()?;
    let ids = inventory.find_ids(&args.tunnels).await?;
    inventory.cleanup(&ids, connector_id).await?;

    if !global.quiet {
        eprintln!("Cleaned up connections of {} tunnel(s)", ids.len());
    }
    Ok(())
}
