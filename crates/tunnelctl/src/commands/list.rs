//! `list` handler.

use chrono::{DateTime, SecondsFormat, Utc};
use tabled::Tabled;
use tracing::warn;

use tunnelctl_core::{Filter, Tunnel, format_connections, sort_tunnels};

use crate::cli::{GlobalOpts, ListArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TunnelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "CONNECTIONS")]
    connections: String,
}

impl TunnelRow {
    fn new(t: &Tunnel, show_recently_disconnected: bool) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            created: t.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            connections: format_connections(&t.connections, show_recently_disconnected),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: ListArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = OutputFormat::from_flag(&args.output)?;
    let filter = build_filter(&args)?;

    let inventory = settings.inventory()?;
    let mut tunnels = inventory.list(&filter).await?;

    let outcome = sort_tunnels(&mut tunnels, &args.sort_by, args.invert_sort);
    if let Some(warning) = outcome.warning() {
        warn!("{warning}");
    }

    let color = output::should_color(global.color);
    let out = output::render(format, &tunnels, |tunnels| {
        render_table(tunnels, args.show_recently_disconnected, color)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn build_filter(args: &ListArgs) -> Result<Filter, CliError> {
    let mut filter = Filter::new();
    if !args.show_deleted {
        filter.no_deleted();
    }
    if let Some(name) = args.name.as_deref().filter(|n| !n.is_empty()) {
        filter.by_name(name);
    }
    if let Some(ref when) = args.when {
        let at = DateTime::parse_from_rfc3339(when).map_err(|_| CliError::Invalid {
            message: format!("{when} is not a valid RFC3339 time"),
        })?;
        filter.by_existed_at(at.with_timezone(&Utc));
    }
    if let Some(id) = args.id.as_deref().filter(|i| !i.is_empty()) {
        filter.by_tunnel_id(util::parse_uuid(id, "tunnel ID")?);
    }
    Ok(filter)
}

fn render_table(tunnels: &[Tunnel], show_recently_disconnected: bool, color: bool) -> String {
    if tunnels.is_empty() {
        return "You have no tunnels, use 'tunnelctl create' to define a new tunnel".into();
    }

    let rows: Vec<TunnelRow> = tunnels
        .iter()
        .map(|t| TunnelRow::new(t, show_recently_disconnected))
        .collect();
    format!(
        "{}\n{}",
        output::hint(
            "You can obtain more detailed information for each tunnel with `tunnelctl info <name/uuid>`",
            color
        ),
        output::render_table(&rows)
    )
}
