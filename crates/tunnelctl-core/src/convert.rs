// ── API-to-domain type conversions ──
//
// Bridges raw `tunnelctl_api::types` into `tunnelctl_core::model`. The wire
// encodes "never deleted" as either a missing field or the zero time; both
// become `None` here.

use chrono::{DateTime, Utc};

use tunnelctl_api::types::{
    ActiveClientResponse, ConnectionResponse, RouteRequest, RouteResultResponse, TunnelResponse,
};

use crate::error::CoreError;
use crate::model::{Change, Connection, Connector, Route, RouteResult, Tunnel};

// ── Helpers ────────────────────────────────────────────────────────

/// Treat the Unix epoch (and anything before it) as "unset".
fn non_zero_time(at: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    at.filter(|t| t.timestamp() > 0)
}

fn parse_change(field: &str, raw: Option<&str>) -> Result<Change, CoreError> {
    let raw = raw.ok_or_else(|| {
        CoreError::Internal(format!("route result is missing the `{field}` field"))
    })?;
    raw.parse().map_err(|_| {
        CoreError::Internal(format!("route result has unknown `{field}` value '{raw}'"))
    })
}

// ── Tunnels ────────────────────────────────────────────────────────

impl From<ConnectionResponse> for Connection {
    fn from(c: ConnectionResponse) -> Self {
        Self {
            colo_name: c.colo_name,
            id: c.id,
            is_pending_reconnect: c.is_pending_reconnect,
            origin_ip: c.origin_ip,
            opened_at: c.opened_at,
        }
    }
}

impl From<TunnelResponse> for Tunnel {
    fn from(t: TunnelResponse) -> Self {
        Self {
            id: t.id,
            name: t.name,
            created_at: t.created_at,
            deleted_at: non_zero_time(t.deleted_at),
            connections: t.connections.into_iter().map(Connection::from).collect(),
        }
    }
}

impl From<ActiveClientResponse> for Connector {
    fn from(c: ActiveClientResponse) -> Self {
        Self {
            id: c.id,
            features: c.features,
            version: c.version,
            arch: c.arch,
            run_at: c.run_at,
            connections: c.connections.into_iter().map(Connection::from).collect(),
        }
    }
}

// ── Routes ─────────────────────────────────────────────────────────

impl From<&Route> for RouteRequest {
    fn from(route: &Route) -> Self {
        match route {
            Route::Dns {
                hostname,
                overwrite_existing,
            } => Self::Dns {
                user_hostname: hostname.clone(),
                overwrite_existing: *overwrite_existing,
            },
            Route::Lb { hostname, pool } => Self::Lb {
                lb_name: hostname.clone(),
                lb_pool: pool.clone(),
            },
        }
    }
}

/// Pair the control plane's answer with the route that produced it.
pub fn route_result(route: &Route, resp: &RouteResultResponse) -> Result<RouteResult, CoreError> {
    match route {
        Route::Dns { hostname, .. } => Ok(RouteResult::Dns {
            hostname: resp.name.clone().unwrap_or_else(|| hostname.clone()),
            cname: parse_change("cname", resp.cname.as_deref())?,
        }),
        Route::Lb { hostname, pool } => Ok(RouteResult::Lb {
            load_balancer_name: hostname.clone(),
            pool_name: pool.clone(),
            load_balancer: parse_change("load_balancer", resp.load_balancer.as_deref())?,
            pool: parse_change("pool", resp.pool.as_deref())?,
        }),
    }
}
