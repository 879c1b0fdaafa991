//! CLI-owned configuration: TOML profiles, token resolution, and the
//! per-invocation `Settings` value.
//!
//! Core never sees these types. Handlers receive a `Settings` built once
//! from the config file, environment and global flags.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use tunnelctl_api::{TlsMode, TransportConfig, TunnelClient};
use tunnelctl_core::{CredentialsLocation, Inventory, RemoteStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "https://api.tunnelctl.dev/client/v4/";
pub const DEFAULT_CREDENTIALS_DIR: &str = "~/.tunnelctl";
pub const DEFAULT_CONNECTOR: &str = "tunnel-agent";
const KEYRING_SERVICE: &str = "tunnelctl";

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when --profile is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// One control-plane account and its local state.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    pub api_url: Option<String>,
    pub account_id: Option<String>,
    /// Zone for DNS and load-balancer routes.
    pub zone_id: Option<String>,
    /// API token (plaintext -- prefer keyring or env var).
    pub api_token: Option<String>,
    /// Environment variable holding the API token.
    pub api_token_env: Option<String>,
    /// Tunnel `run` uses when no argument is given.
    pub tunnel: Option<String>,
    /// Legacy setting; ignored by named tunnels.
    pub hostname: Option<String>,
    pub credentials_dir: Option<PathBuf>,
    /// Custom CA certificate for the control-plane API.
    pub ca_cert: Option<PathBuf>,
    pub connector: ConnectorConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Program `run` hands the tunnel to.
    pub program: Option<String>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path. `TUNNELCTL_CONFIG` overrides the
/// platform location.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TUNNELCTL_CONFIG") {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "tunnelctl", "tunnelctl").map_or_else(
        || PathBuf::from(".tunnelctl").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("TUNNELCTL_CONFIG_").split("__"))
        .extract()?;
    Ok(config)
}

pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(cfg).map_err(|e| CliError::Serialize {
        message: format!("failed to serialize config: {e}"),
    })?;
    std::fs::write(&path, body)?;
    Ok(())
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

pub fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, CliError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-token")).map_err(|e| {
        CliError::ConfigMessage {
            message: format!("failed to access keyring: {e}"),
        }
    })
}

// ── Settings ─────────────────────────────────────────────────────────

/// Everything one invocation needs, resolved once.
#[derive(Debug)]
pub struct Settings {
    pub profile_name: String,
    pub api_url: String,
    pub account_id: Option<String>,
    pub zone_id: Option<String>,
    pub api_token: Option<SecretString>,
    pub timeout: Duration,
    pub ca_cert: Option<PathBuf>,
    pub tunnel: Option<String>,
    pub hostname: Option<String>,
    pub credentials_dir: PathBuf,
    pub connector_program: String,
}

impl Settings {
    /// Merge global flags (flag > env > profile > default) over the
    /// active profile. A missing profile is only an error when named
    /// explicitly.
    pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Self, CliError> {
        let profile_name = active_profile_name(global, config);
        let profile = match config.profiles.get(&profile_name) {
            Some(p) => p.clone(),
            None if global.profile.is_some() => {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(config),
                    name: profile_name,
                });
            }
            None => Profile::default(),
        };

        let api_token = resolve_api_token(&profile, &profile_name, global);

        Ok(Self {
            api_url: global
                .api_url
                .clone()
                .or(profile.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            account_id: global.account.clone().or(profile.account_id),
            zone_id: global.zone.clone().or(profile.zone_id),
            api_token,
            timeout: Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout)),
            ca_cert: profile.ca_cert,
            tunnel: profile.tunnel,
            hostname: profile.hostname,
            credentials_dir: profile
                .credentials_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_DIR)),
            connector_program: profile
                .connector
                .program
                .unwrap_or_else(|| DEFAULT_CONNECTOR.into()),
            profile_name,
        })
    }

    /// Explicit file if given, otherwise `<credentials_dir>/<id>.json`.
    pub fn credentials_location(&self, explicit: Option<PathBuf>) -> CredentialsLocation {
        explicit.map_or_else(
            || CredentialsLocation::Dir(self.credentials_dir.clone()),
            CredentialsLocation::File,
        )
    }

    /// Build the HTTP-backed inventory for this invocation.
    pub fn inventory(&self) -> Result<Inventory<RemoteStore>, CliError> {
        let account_id = self.account_id.clone().ok_or_else(|| CliError::NoAccount {
            profile: self.profile_name.clone(),
        })?;
        let token = self
            .api_token
            .as_ref()
            .ok_or_else(|| CliError::NoCredentials {
                profile: self.profile_name.clone(),
            })?;

        let transport = TransportConfig {
            tls: self
                .ca_cert
                .clone()
                .map_or(TlsMode::System, TlsMode::CustomCa),
            timeout: self.timeout,
        };
        let client = TunnelClient::from_token(
            &self.api_url,
            account_id,
            self.zone_id.clone(),
            token,
            &transport,
        )
        .map_err(tunnelctl_core::CoreError::from)?;

        Ok(Inventory::new(RemoteStore::new(client)))
    }
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ── Credential helpers ───────────────────────────────────────────────

/// Token chain: flag/env > profile's `api_token_env` > keyring > plaintext.
fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Option<SecretString> {
    if let Some(ref token) = global.api_token {
        return Some(SecretString::from(token.clone()));
    }

    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    profile.api_token.clone().map(SecretString::from)
}
