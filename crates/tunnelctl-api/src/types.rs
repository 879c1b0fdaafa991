// Wire types for the control-plane REST API.
//
// Field names follow the JSON the API sends (snake_case). These types are
// converted into domain models by `tunnelctl-core`; nothing above the core
// sees them.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Envelope ─────────────────────────────────────────────────────────

/// Every response is wrapped in `{ success, errors, messages, result }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

// ── Tunnels ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TunnelResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub connections: Vec<ConnectionResponse>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionResponse {
    pub colo_name: String,
    pub id: Uuid,
    #[serde(default)]
    pub is_pending_reconnect: bool,
    pub origin_ip: IpAddr,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTunnelRequest {
    pub name: String,
    /// Base64-encoded 32-byte secret.
    pub tunnel_secret: String,
}

// ── Connectors ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActiveClientResponse {
    pub id: Uuid,
    #[serde(default)]
    pub features: Vec<String>,
    pub version: String,
    pub arch: String,
    pub run_at: DateTime<Utc>,
    #[serde(rename = "conns", default)]
    pub connections: Vec<ConnectionResponse>,
}

// ── Routes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RouteRequest {
    Dns {
        user_hostname: String,
        overwrite_existing: bool,
    },
    Lb {
        lb_name: String,
        lb_pool: String,
    },
}

/// Route result. DNS routes fill `cname` + `name`, LB routes fill
/// `load_balancer` + `pool`. Each value is one of `new`, `updated`,
/// `unchanged`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResultResponse {
    #[serde(default)]
    pub cname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub load_balancer: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
}
