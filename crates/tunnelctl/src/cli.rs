//! Clap derive structures for the `tunnelctl` CLI.
//!
//! Positional arguments are collected as plain vectors; their arity is
//! checked by the command handlers so the usage messages stay precise.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tunnelctl -- manage remote network tunnels and their routes
#[derive(Debug, Parser)]
#[command(
    name = "tunnelctl",
    version,
    about = "Create, inspect, route and run remote network tunnels",
    long_about = "Manage the tunnels of a control-plane account from the command line.\n\n\
        Tunnels are referenced by UUID or by name. `run` hands a resolved tunnel\n\
        and its credentials to the connector program.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "TUNNELCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Control-plane API base URL (overrides profile)
    #[arg(long, env = "TUNNELCTL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Account that owns the tunnels (overrides profile)
    #[arg(long, env = "TUNNELCTL_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Zone used for DNS and load-balancer routes (overrides profile)
    #[arg(long, env = "TUNNELCTL_ZONE", global = true)]
    pub zone: Option<String>,

    /// API token
    #[arg(long, env = "TUNNELCTL_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds (overrides `[defaults] timeout`, 30 if unset)
    #[arg(long, env = "TUNNELCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new tunnel with the given name
    Create(CreateArgs),

    /// List existing tunnels
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show the active connectors of a tunnel
    Info(InfoArgs),

    /// Delete existing tunnels by name or UUID
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Run a tunnel through the connector program
    Run(RunArgs),

    /// Remove stale connections of tunnels
    Cleanup(CleanupArgs),

    /// Route traffic to a tunnel via DNS or a load balancer
    Route(RouteArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── create ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// NAME of the new tunnel
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Output format: json or yaml (default: table)
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,

    /// File to write the tunnel credentials to
    #[arg(long, env = "TUNNEL_CRED_FILE")]
    pub credentials_file: Option<PathBuf>,
}

// ── list ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include deleted tunnels
    #[arg(long, short = 'd')]
    pub show_deleted: bool,

    /// Only tunnels with this name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Only tunnels that existed at this RFC3339 time
    #[arg(long, short = 'w')]
    pub when: Option<String>,

    /// Only the tunnel with this UUID
    #[arg(long, short = 'i')]
    pub id: Option<String>,

    /// Count connections that recently disconnected and are being retried
    #[arg(long, visible_alias = "rd")]
    pub show_recently_disconnected: bool,

    /// Output format: json or yaml (default: table)
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,

    /// Sort by name, id, createdAt, deletedAt or numConnections
    #[arg(long, env = "TUNNEL_LIST_SORT_BY", default_value = "name")]
    pub sort_by: String,

    /// Sort in descending order
    #[arg(long, env = "TUNNEL_LIST_INVERT_SORT")]
    pub invert_sort: bool,
}

// ── info ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// TUNNEL name or UUID
    #[arg(value_name = "TUNNEL")]
    pub tunnels: Vec<String>,

    /// Output format: json or yaml (default: table)
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,

    /// Count connections that recently disconnected and are being retried
    #[arg(long, visible_alias = "rd")]
    pub show_recently_disconnected: bool,

    /// Sort connectors by id, createdAt, numConnections or version
    #[arg(long, env = "TUNNEL_INFO_SORT_BY", default_value = "createdAt")]
    pub sort_by: String,

    /// Sort in descending order
    #[arg(long, env = "TUNNEL_INFO_INVERT_SORT")]
    pub invert_sort: bool,
}

// ── delete ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// TUNNEL names or UUIDs
    #[arg(value_name = "TUNNEL")]
    pub tunnels: Vec<String>,

    /// Credentials file to remove after deleting
    #[arg(long, env = "TUNNEL_CRED_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Clean up stale connections before deleting
    #[arg(long, short = 'f')]
    pub force: bool,
}

// ── run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// TUNNEL name or UUID (defaults to the profile's `tunnel`)
    #[arg(value_name = "TUNNEL")]
    pub tunnels: Vec<String>,

    /// Take over the tunnel even if other connectors are running
    #[arg(long)]
    pub force: bool,

    /// Credentials file for the tunnel
    #[arg(long, env = "TUNNEL_CRED_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Transport protocol passed to the connector
    #[arg(long, env = "TUNNEL_TRANSPORT_PROTOCOL", default_value = "auto")]
    pub protocol: String,

    /// Opt into connector features
    #[arg(long, short = 'F', value_delimiter = ',')]
    pub features: Vec<String>,
}

// ── cleanup ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// TUNNEL names or UUIDs
    #[arg(value_name = "TUNNEL")]
    pub tunnels: Vec<String>,

    /// Only remove connections of this connector
    #[arg(long, short = 'c')]
    pub connector_id: Option<String>,
}

// ── route ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(after_help = "Usage:\n  \
    tunnelctl route dns TUNNEL HOSTNAME\n  \
    tunnelctl route lb TUNNEL LB-HOSTNAME POOL")]
pub struct RouteArgs {
    /// Route type (dns or lb), tunnel, then the route's own arguments
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Overwrite an existing DNS record for the hostname
    #[arg(long, short = 'f')]
    pub overwrite_dns: bool,
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Print the configuration file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Interactive configuration wizard
    Init,

    /// Store an API token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
        name: Option<String>,
    },
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
