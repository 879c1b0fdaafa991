//! `info` handler.

use chrono::SecondsFormat;
use tabled::Tabled;
use tracing::warn;

use tunnelctl_core::{Connector, TunnelInfo, format_connections, sort_connectors};

use crate::cli::{GlobalOpts, InfoArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConnectorRow {
    #[tabled(rename = "CONNECTOR ID")]
    id: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "ARCHITECTURE")]
    arch: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "ORIGIN IP")]
    origin_ip: String,
    #[tabled(rename = "EDGE")]
    edge: String,
}

impl ConnectorRow {
    /// `None` when the connector has nothing to show.
    fn new(c: &Connector, show_recently_disconnected: bool) -> Option<Self> {
        let edge = format_connections(&c.connections, show_recently_disconnected);
        if edge.is_empty() {
            return None;
        }
        Some(Self {
            id: c.id.to_string(),
            created: c.run_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            arch: c.arch.clone(),
            version: c.version.clone(),
            origin_ip: c
                .connections
                .first()
                .map(|conn| conn.origin_ip.to_string())
                .unwrap_or_default(),
            edge,
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: InfoArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::check_arity(
        "info",
        args.tunnels.len(),
        1,
        Some(1),
        "\"tunnelctl info\" accepts exactly one argument, the ID or name of the tunnel to get info about.",
    )?;
    let format = OutputFormat::from_flag(&args.output)?;

    let inventory = settings.inventory()?;
    let id = inventory.find_id(&args.tunnels[0]).await?;
    let mut info = inventory.info(id).await?;

    let outcome = sort_connectors(&mut info.connectors, &args.sort_by, args.invert_sort);
    if let Some(warning) = outcome.warning() {
        warn!("{warning}");
    }

    let color = output::should_color(global.color);
    let out = output::render(format, &info, |info| {
        render_info(info, args.show_recently_disconnected, color)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_info(info: &TunnelInfo, show_recently_disconnected: bool, color: bool) -> String {
    if info.connectors.is_empty() {
        return format!("Your tunnel {} does not have any active connection.", info.id);
    }

    let header = format!(
        "{}{}\n{}{}\n{}{}\n",
        output::emphasize("NAME:     ", color),
        info.name,
        output::emphasize("ID:       ", color),
        info.id,
        output::emphasize("CREATED:  ", color),
        info.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    let rows: Vec<ConnectorRow> = info
        .connectors
        .iter()
        .filter_map(|c| ConnectorRow::new(c, show_recently_disconnected))
        .collect();
    if rows.is_empty() {
        return format!("{header}\nThis tunnel has no active connectors.");
    }

    format!("{header}\n{}", output::render_table(&rows))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::DateTime;
    use uuid::Uuid;

    use tunnelctl_core::Connection;

    use super::*;

    fn connection(colo: &str, pending: bool) -> Connection {
        Connection {
            colo_name: colo.into(),
            id: Uuid::new_v4(),
            is_pending_reconnect: pending,
            origin_ip: "198.51.100.7".parse().unwrap(),
            opened_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    fn info(connectors: Vec<Connector>) -> TunnelInfo {
        TunnelInfo {
            id: Uuid::nil(),
            name: "web".into(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            connectors,
        }
    }

    fn connector(connections: Vec<Connection>) -> Connector {
        Connector {
            id: Uuid::from_u128(9),
            features: vec![],
            version: "2024.1.0".into(),
            arch: "linux_arm64".into(),
            run_at: DateTime::from_timestamp(1_700_000_100, 0).unwrap(),
            connections,
        }
    }

    #[test]
    fn no_connectors_at_all() {
        assert_eq!(
            render_info(&info(vec![]), false, false),
            "Your tunnel 00000000-0000-0000-0000-000000000000 does not have any active connection."
        );
    }

    #[test]
    fn only_pending_connections_means_no_active_connectors() {
        let out = render_info(&info(vec![connector(vec![connection("LAX", true)])]), false, false);
        assert!(out.starts_with("NAME:     web\nID:       00000000-0000-0000-0000-000000000000\n"));
        assert!(out.ends_with("This tunnel has no active connectors."));
    }

    #[test]
    fn connector_table_columns() {
        let out = render_info(
            &info(vec![connector(vec![connection("LAX", true), connection("JFK", false)])]),
            true,
            false,
        );
        for col in ["CONNECTOR ID", "CREATED", "ARCHITECTURE", "VERSION", "ORIGIN IP", "EDGE"] {
            assert!(out.contains(col), "{out}");
        }
        assert!(out.contains("1xJFK, 1xLAX"));
        assert!(out.contains("198.51.100.7"));
        assert!(out.contains("linux_arm64"));
    }
}
