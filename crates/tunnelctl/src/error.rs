//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use uuid::Uuid;

use tunnelctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Usage ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(tunnelctl::usage),
        help("Run: tunnelctl {command} --help")
    )]
    Usage { command: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(tunnelctl::invalid))]
    Invalid { message: String },

    #[error("{route_type} is not a recognized route type. Supported route types are dns and lb")]
    #[diagnostic(
        code(tunnelctl::route_type),
        help(
            "tunnelctl route dns TUNNEL HOSTNAME\n\
             tunnelctl route lb TUNNEL LB-HOSTNAME POOL"
        )
    )]
    UnrecognizedRouteType { route_type: String },

    #[error("Unknown output format '{format}'")]
    #[diagnostic(
        code(tunnelctl::output_format),
        help("Use --output json or --output yaml, or omit --output for a table.")
    )]
    UnknownFormat { format: String },

    // ── Tunnels ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(tunnelctl::not_found),
        help("Run: tunnelctl list to see your tunnels")
    )]
    NotFound { message: String },

    #[error("Tunnel {id} has already been deleted")]
    #[diagnostic(code(tunnelctl::already_deleted))]
    AlreadyDeleted { id: Uuid },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("{} already exists", path.display())]
    #[diagnostic(
        code(tunnelctl::credentials_exist),
        help("Choose another path with --credentials-file, or move the existing file away.")
    )]
    AlreadyExists { path: PathBuf },

    #[error("{message}")]
    #[diagnostic(
        code(tunnelctl::credentials),
        help(
            "Pass --credentials-file, or set credentials_dir in your profile.\n\
             Credentials are written by: tunnelctl create NAME"
        )
    )]
    Credentials { message: String },

    #[error("{message}")]
    #[diagnostic(code(tunnelctl::credentials_not_written))]
    CredentialsNotWritten { message: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("Could not connect to the control plane at {url}")]
    #[diagnostic(
        code(tunnelctl::connection_failed),
        help("Check network access and the api_url of your profile.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tunnelctl::auth_failed),
        help(
            "Verify your API token and its permissions.\n\
             Run: tunnelctl config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(tunnelctl::no_credentials),
        help(
            "Configure one with: tunnelctl config init\n\
             Or set the TUNNELCTL_API_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(tunnelctl::timeout),
        help("Increase the timeout with --timeout.")
    )]
    Timeout { seconds: u64 },

    #[error("API error{}: {message}", code_suffix(*.code))]
    #[diagnostic(code(tunnelctl::api_error))]
    Api { code: Option<i64>, message: String },

    /// A remote failure with the operation it interrupted.
    #[error("{context}")]
    #[diagnostic(code(tunnelctl::remote))]
    Remote {
        context: String,
        #[source]
        source: Box<CliError>,
    },

    // ── Run ──────────────────────────────────────────────────────────
    #[error("Failed to start connector '{program}'")]
    #[diagnostic(
        code(tunnelctl::connector),
        help("Install the connector or set `connector.program` in your profile.")
    )]
    ConnectorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connector exited with status {code}")]
    #[diagnostic(code(tunnelctl::connector_exit))]
    ConnectorExit { code: i32 },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No account configured for profile '{profile}'")]
    #[diagnostic(
        code(tunnelctl::no_account),
        help(
            "Set account_id with: tunnelctl config init\n\
             Or pass --account / set TUNNELCTL_ACCOUNT."
        )
    )]
    NoAccount { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tunnelctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tunnelctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(tunnelctl::config))]
    ConfigMessage { message: String },

    #[error(transparent)]
    #[diagnostic(code(tunnelctl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {message}")]
    #[diagnostic(code(tunnelctl::serialize))]
    Serialize { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(tunnelctl::internal))]
    Internal { message: String },
}

fn code_suffix(code: Option<i64>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    pub fn usage(command: &str, message: impl Into<String>) -> Self {
        Self::Usage {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. }
            | Self::Invalid { .. }
            | Self::UnrecognizedRouteType { .. }
            | Self::UnknownFormat { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::AlreadyExists { .. } | Self::AlreadyDeleted { .. } => exit_code::CONFLICT,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Remote { source, .. } => source.exit_code(),
            Self::ConnectorExit { code } => *code,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Usage { message } => CliError::Invalid { message },

            err @ CoreError::Validation { .. } => CliError::Invalid {
                message: err.to_string(),
            },

            CoreError::UnrecognizedRouteType { route_type } => {
                CliError::UnrecognizedRouteType { route_type }
            }

            err @ (CoreError::TunnelNotFound { .. } | CoreError::AmbiguousTunnel { .. }) => {
                CliError::NotFound {
                    message: err.to_string(),
                }
            }

            CoreError::AlreadyDeleted { id } => CliError::AlreadyDeleted { id },

            CoreError::AlreadyExists { path } => CliError::AlreadyExists { path },

            err @ (CoreError::CredentialsNotFound { .. }
            | CoreError::InvalidCredentials { .. }) => CliError::Credentials {
                message: err.to_string(),
            },

            CoreError::CredentialsNotWritten { message } => {
                CliError::CredentialsNotWritten { message }
            }

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Api { message, code, .. } => CliError::Api { code, message },

            CoreError::Remote { context, source } => CliError::Remote {
                context,
                source: Box::new(CliError::from(*source)),
            },

            CoreError::Io(e) => CliError::Io(e),

            CoreError::Json(e) => CliError::Serialize {
                message: e.to_string(),
            },

            CoreError::Config { message } => CliError::ConfigMessage { message },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}
