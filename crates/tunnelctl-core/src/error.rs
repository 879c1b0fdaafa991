// ── Core error types ──
//
// User-facing errors from tunnelctl-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures from the
// wire directly. The `From<tunnelctl_api::Error>` impl translates
// transport-layer errors into domain variants.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Usage / validation ───────────────────────────────────────────
    /// Wrong argument count or shape.
    #[error("{message}")]
    Usage { message: String },

    /// A value failed syntactic validation.
    #[error("{value} is not a valid {what}")]
    Validation { what: String, value: String },

    #[error("{route_type} is not a recognized route type. Supported route types are dns and lb")]
    UnrecognizedRouteType { route_type: String },

    // ── Inventory ────────────────────────────────────────────────────
    #[error("{identifier} is neither the ID nor the name of any of your tunnels")]
    TunnelNotFound { identifier: String },

    #[error("Expected to find a single tunnel with uuid {id} but found {found} tunnels.")]
    AmbiguousTunnel { id: Uuid, found: usize },

    #[error("Tunnel {id} has already been deleted")]
    AlreadyDeleted { id: Uuid },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Tunnel credentials file '{}' doesn't exist or is not a file", path.display())]
    CredentialsNotFound { path: PathBuf },

    #[error("Invalid tunnel credentials in {}: {message}", path.display())]
    InvalidCredentials { path: PathBuf, message: String },

    /// The tunnel was created remotely but its credentials could not be saved.
    #[error("{message}")]
    CredentialsNotWritten { message: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Cannot connect to control plane at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Control plane request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<i64>,
        status: Option<u16>,
    },

    /// A remote error with the operation it interrupted.
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Local I/O ────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn invalid(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Validation {
            what: what.into(),
            value: value.into(),
        }
    }

    /// Wrap this error with the operation that failed.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Remote {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tunnelctl_api::Error> for CoreError {
    fn from(err: tunnelctl_api::Error) -> Self {
        match err {
            tunnelctl_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tunnelctl_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            tunnelctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tunnelctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            tunnelctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            tunnelctl_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: None,
                status: Some(429),
            },
            tunnelctl_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            tunnelctl_api::Error::MissingZone => CoreError::Config {
                message: "routing requires a zone; set `zone_id` in your profile or pass --zone"
                    .into(),
            },
            tunnelctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
