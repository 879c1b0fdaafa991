// ── Tunnel, connector and connection records ──

use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, UUID-identified tunnel. `name` is a label, not an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunnel {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub connections: Vec<Connection>,
}

impl Tunnel {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One edge-network session held by a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub colo_name: String,
    pub id: Uuid,
    /// Recently disconnected and being retried.
    pub is_pending_reconnect: bool,
    pub origin_ip: IpAddr,
    pub opened_at: DateTime<Utc>,
}

/// A running instance of the tunnel agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: Uuid,
    pub features: Vec<String>,
    pub version: String,
    pub arch: String,
    pub run_at: DateTime<Utc>,
    #[serde(rename = "conns")]
    pub connections: Vec<Connection>,
}

/// What `info` renders: the tunnel identity plus its active connectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "conns")]
    pub connectors: Vec<Connector>,
}

/// Summarize connections per colo as `"<count>x<colo>"`, colos sorted,
/// joined by `", "`. Pending-reconnect entries only count when
/// `show_recently_disconnected` is set.
pub fn format_connections(connections: &[Connection], show_recently_disconnected: bool) -> String {
    let mut per_colo: BTreeMap<&str, usize> = BTreeMap::new();
    for conn in connections {
        if !conn.is_pending_reconnect || show_recently_disconnected {
            *per_colo.entry(conn.colo_name.as_str()).or_default() += 1;
        }
    }

    per_colo
        .iter()
        .map(|(colo, count)| format!("{count}x{colo}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn conn(colo: &str, pending: bool) -> Connection {
        Connection {
            colo_name: colo.into(),
            id: Uuid::new_v4(),
            is_pending_reconnect: pending,
            origin_ip: "198.51.100.4".parse().unwrap(),
            opened_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn excludes_pending_reconnects_by_default() {
        let conns = [conn("LAX", false), conn("LAX", true), conn("JFK", false)];
        assert_eq!(format_connections(&conns, false), "1xJFK, 1xLAX");
    }

    #[test]
    fn counts_pending_reconnects_when_requested() {
        let conns = [conn("LAX", false), conn("LAX", true), conn("JFK", false)];
        assert_eq!(format_connections(&conns, true), "1xJFK, 2xLAX");
    }

    #[test]
    fn empty_when_all_pending() {
        let conns = [conn("AMS", true)];
        assert_eq!(format_connections(&conns, false), "");
        assert_eq!(format_connections(&[], true), "");
    }

    #[test]
    fn info_serializes_with_wire_names() {
        let info = TunnelInfo {
            id: Uuid::nil(),
            name: "web".into(),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            connectors: vec![],
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("conns").is_some());
    }
}
