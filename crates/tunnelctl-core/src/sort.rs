// ── Sort engine ──
//
// Sort keys are parsed into closed enums before dispatch. An unknown key
// never fails the command: the default field is used and the outcome
// carries the rejected key so the caller can warn.

use std::cmp::Ordering;
use std::str::FromStr;

use strum::{Display, EnumString, VariantNames};

use crate::model::{Connector, Tunnel};

/// A closed set of sort fields for records of type `T`.
pub trait SortField<T>: Copy + Default + FromStr + VariantNames + ToString {
    fn compare(self, a: &T, b: &T) -> Ordering;

    /// Comma-separated list of valid keys, for help and warning text.
    fn valid_options() -> String {
        Self::VARIANTS.join(", ")
    }
}

/// Fields `list` can sort tunnels by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, VariantNames)]
pub enum TunnelSortField {
    #[default]
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "id")]
    Id,
    #[strum(serialize = "createdAt")]
    CreatedAt,
    #[strum(serialize = "deletedAt")]
    DeletedAt,
    #[strum(serialize = "numConnections")]
    NumConnections,
}

impl SortField<Tunnel> for TunnelSortField {
    fn compare(self, a: &Tunnel, b: &Tunnel) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Id => a.id.to_string().cmp(&b.id.to_string()),
            Self::CreatedAt => a.created_at.timestamp().cmp(&b.created_at.timestamp()),
            // Live tunnels (no deletion time) order before deleted ones.
            Self::DeletedAt => a
                .deleted_at
                .map(|t| t.timestamp())
                .cmp(&b.deleted_at.map(|t| t.timestamp())),
            Self::NumConnections => a.connections.len().cmp(&b.connections.len()),
        }
    }
}

/// Fields `info` can sort connectors by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, VariantNames)]
pub enum ConnectorSortField {
    #[strum(serialize = "id")]
    Id,
    #[default]
    #[strum(serialize = "createdAt")]
    CreatedAt,
    #[strum(serialize = "numConnections")]
    NumConnections,
    #[strum(serialize = "version")]
    Version,
}

impl SortField<Connector> for ConnectorSortField {
    fn compare(self, a: &Connector, b: &Connector) -> Ordering {
        match self {
            Self::Id => a.id.to_string().cmp(&b.id.to_string()),
            Self::CreatedAt => a.run_at.timestamp().cmp(&b.run_at.timestamp()),
            Self::NumConnections => a.connections.len().cmp(&b.connections.len()),
            Self::Version => a.version.cmp(&b.version),
        }
    }
}

/// Result of a sort: the field actually used, and the rejected key if
/// the requested one was unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    pub field: String,
    pub invalid_field: Option<String>,
    pub valid_options: String,
}

impl SortOutcome {
    pub fn is_valid(&self) -> bool {
        self.invalid_field.is_none()
    }

    /// Warning text for an unknown key, if there was one.
    pub fn warning(&self) -> Option<String> {
        self.invalid_field.as_ref().map(|key| {
            format!(
                "{key} is not a valid sort field. Valid sort fields are {}. Defaulting to '{}'.",
                self.valid_options, self.field
            )
        })
    }
}

/// Stable sort of `records` by the field named `key`.
///
/// `invert` reverses the comparison result, giving descending order.
pub fn sort_by_field<T, F: SortField<T>>(records: &mut [T], key: &str, invert: bool) -> SortOutcome {
    let (field, invalid_field) = match key.parse::<F>() {
        Ok(field) => (field, None),
        Err(_) => (F::default(), Some(key.to_owned())),
    };

    records.sort_by(|a, b| {
        let ord = field.compare(a, b);
        if invert { ord.reverse() } else { ord }
    });

    SortOutcome {
        field: field.to_string(),
        invalid_field,
        valid_options: F::valid_options(),
    }
}

pub fn sort_tunnels(tunnels: &mut [Tunnel], key: &str, invert: bool) -> SortOutcome {
    sort_by_field::<Tunnel, TunnelSortField>(tunnels, key, invert)
}

pub fn sort_connectors(connectors: &mut [Connector], key: &str, invert: bool) -> SortOutcome {
    sort_by_field::<Connector, ConnectorSortField>(connectors, key, invert)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::model::Connection;

    fn conn() -> Connection {
        Connection {
            colo_name: "LAX".into(),
            id: Uuid::new_v4(),
            is_pending_reconnect: false,
            origin_ip: "192.0.2.1".parse().unwrap(),
            opened_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn tunnel(id: u128, name: &str, created: i64, deleted: Option<i64>, conns: usize) -> Tunnel {
        Tunnel {
            id: Uuid::from_u128(id),
            name: name.into(),
            created_at: DateTime::from_timestamp(created, 0).unwrap(),
            deleted_at: deleted.map(|d| DateTime::from_timestamp(d, 0).unwrap()),
            connections: (0..conns).map(|_| conn()).collect(),
        }
    }

    fn sample() -> Vec<Tunnel> {
        vec![
            tunnel(3, "charlie", 300, Some(900), 1),
            tunnel(1, "alpha", 200, Some(700), 3),
            tunnel(4, "delta", 100, None, 0),
            tunnel(2, "bravo", 400, Some(800), 2),
        ]
    }

    fn names(tunnels: &[Tunnel]) -> Vec<&str> {
        tunnels.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn sorts_by_each_tunnel_field() {
        let cases = [
            ("name", vec!["alpha", "bravo", "charlie", "delta"]),
            ("id", vec!["alpha", "bravo", "charlie", "delta"]),
            ("createdAt", vec!["delta", "alpha", "charlie", "bravo"]),
            ("deletedAt", vec!["delta", "alpha", "bravo", "charlie"]),
            ("numConnections", vec!["delta", "charlie", "bravo", "alpha"]),
        ];
        for (key, expected) in cases {
            let mut tunnels = sample();
            let outcome = sort_tunnels(&mut tunnels, key, false);
            assert!(outcome.is_valid(), "{key}");
            assert_eq!(names(&tunnels), expected, "{key}");
        }
    }

    #[test]
    fn invert_reverses_every_valid_key() {
        for key in TunnelSortField::VARIANTS {
            let mut tunnels = sample();
            sort_tunnels(&mut tunnels, key, false);
            let mut ascending = names(&tunnels).into_iter().map(String::from).collect::<Vec<_>>();
            ascending.reverse();

            sort_tunnels(&mut tunnels, key, true);
            assert_eq!(names(&tunnels), ascending, "{key}");
        }
    }

    #[test]
    fn unknown_key_falls_back_to_name() {
        let mut tunnels = sample();
        let outcome = sort_tunnels(&mut tunnels, "colour", false);

        assert_eq!(outcome.invalid_field.as_deref(), Some("colour"));
        assert_eq!(outcome.field, "name");
        assert_eq!(names(&tunnels), vec!["alpha", "bravo", "charlie", "delta"]);
        assert_eq!(
            outcome.warning().unwrap(),
            "colour is not a valid sort field. Valid sort fields are name, id, createdAt, \
             deletedAt, numConnections. Defaulting to 'name'."
        );
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut tunnels = vec![
            tunnel(1, "same", 100, None, 0),
            tunnel(2, "same", 100, None, 0),
            tunnel(3, "same", 100, None, 0),
        ];
        sort_tunnels(&mut tunnels, "createdAt", false);
        let ids: Vec<u128> = tunnels.iter().map(|t| t.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    fn connector(id: u128, run_at: i64, version: &str, conns: usize) -> Connector {
        Connector {
            id: Uuid::from_u128(id),
            features: vec![],
            version: version.into(),
            arch: "linux_amd64".into(),
            run_at: DateTime::from_timestamp(run_at, 0).unwrap(),
            connections: (0..conns).map(|_| conn()).collect(),
        }
    }

    #[test]
    fn sorts_connectors() {
        let mut connectors = vec![
            connector(2, 50, "2024.2.0", 4),
            connector(1, 90, "2024.10.1", 1),
            connector(3, 10, "2023.8.2", 2),
        ];
        let ids = |c: &[Connector]| c.iter().map(|c| c.id.as_u128()).collect::<Vec<_>>();

        sort_connectors(&mut connectors, "createdAt", false);
        assert_eq!(ids(&connectors), vec![3, 2, 1]);

        sort_connectors(&mut connectors, "version", false);
        assert_eq!(ids(&connectors), vec![3, 1, 2]);

        sort_connectors(&mut connectors, "numConnections", true);
        assert_eq!(ids(&connectors), vec![2, 3, 1]);

        sort_connectors(&mut connectors, "id", false);
        assert_eq!(ids(&connectors), vec![1, 2, 3]);
    }

    #[test]
    fn unknown_connector_key_falls_back_to_run_time() {
        let mut connectors = vec![connector(1, 90, "a", 0), connector(2, 10, "b", 0)];
        let outcome = sort_connectors(&mut connectors, "name", false);

        assert_eq!(outcome.field, "createdAt");
        assert_eq!(outcome.invalid_field.as_deref(), Some("name"));
        assert_eq!(connectors[0].id.as_u128(), 2);
        assert_eq!(outcome.valid_options, "id, createdAt, numConnections, version");
    }
}
