//! `delete` handler.

use crate::cli::{DeleteArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

use super::util;

pub async fn handle(
    args: DeleteArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::check_arity(
        "delete",
        args.tunnels.len(),
        1,
        None,
        "\"tunnelctl delete\" requires at least 1 argument, the ID or name of the tunnel to delete.",
    )?;

    let inventory = settings.inventory()?;
    let ids = inventory.find_ids(&args.tunnels).await?;
    let location = settings.credentials_location(args.credentials_file);
    inventory.delete(&ids, args.force, &location).await?;

    if !global.quiet {
        for id in &ids {
            eprintln!("Deleted tunnel {id}");
        }
    }
    Ok(())
}
