//! `create` handler.

use tracing::info;

use crate::cli::{CreateArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

use super::util;

pub async fn handle(
    args: CreateArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::check_arity(
        "create",
        args.names.len(),
        1,
        Some(1),
        "\"tunnelctl create\" requires exactly 1 argument, the name of tunnel to create.",
    )?;
    let format = OutputFormat::from_flag(&args.output)?;
    let name = &args.names[0];

    let inventory = settings.inventory()?;
    let location = settings.credentials_location(args.credentials_file);
    let created = inventory.create(name, &location).await?;
    info!(tunnel_id = %created.tunnel.id, "created tunnel");

    let out = output::render(format, &created.tunnel, |t| {
        format!(
            "Tunnel credentials written to {}. Keep this file secret. \
             To revoke these credentials, delete the tunnel.\n\n\
             Created tunnel {} with id {}",
            created.credentials_path.display(),
            t.name,
            t.id
        )
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
