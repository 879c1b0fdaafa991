use thiserror::Error;

/// Top-level error type for the `tunnelctl-api` crate.
///
/// Covers every failure mode of the control-plane client:
/// authentication, transport, structured API errors, and decoding.
/// `tunnelctl-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API token was rejected (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Rate limited by the control plane.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the `{success, errors, result}` envelope.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<i64>,
        status: u16,
    },

    /// A zone-scoped call was made without a zone configured.
    #[error("No zone configured -- routing requires a zone ID")]
    MissingZone,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
