//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::ConfigMessage {
        message: format!("prompt failed: {e}"),
    }
}

fn store_token_in_keyring(profile_name: &str, token: &str) -> Result<(), CliError> {
    config::keyring_entry(profile_name)?
        .set_password(token)
        .map_err(|e| CliError::ConfigMessage {
            message: format!("failed to store API token in keyring: {e}"),
        })
}

/// Config rendered as TOML with plaintext tokens masked.
fn render_masked(mut cfg: Config) -> Result<String, CliError> {
    for profile in cfg.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some("********".into());
        }
    }
    toml::to_string_pretty(&cfg).map_err(|e| CliError::Serialize {
        message: e.to_string(),
    })
}

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(render_masked(cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: tunnelctl config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { name } => {
            let cfg = config::load_config_or_default();
            let profile_name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::ConfigMessage {
                    message: "API token cannot be empty".into(),
                });
            }
            store_token_in_keyring(&profile_name, &token)?;
            eprintln!("API token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Interactive wizard that writes (or extends) the config file.
fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("tunnelctl configuration wizard");
    eprintln!("  Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(config::DEFAULT_API_URL.into())
        .interact_text()
        .map_err(prompt_err)?;

    let account_id: String = Input::new()
        .with_prompt("Account ID")
        .interact_text()
        .map_err(prompt_err)?;

    let zone_id: String = Input::new()
        .with_prompt("Zone ID (blank to skip routing)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::ConfigMessage {
            message: "API token cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the API token?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let api_token = if store_selection == 0 {
        store_token_in_keyring(&profile_name, &token)?;
        eprintln!("  API token stored in system keyring");
        None
    } else {
        Some(token)
    };

    let credentials_dir: String = Input::new()
        .with_prompt("Credentials directory")
        .default(config::DEFAULT_CREDENTIALS_DIR.into())
        .interact_text()
        .map_err(prompt_err)?;

    let profile = Profile {
        api_url: (api_url != config::DEFAULT_API_URL).then_some(api_url),
        account_id: Some(account_id),
        zone_id: Some(zone_id).filter(|z| !z.is_empty()),
        api_token,
        credentials_dir: Some(PathBuf::from(credentials_dir)),
        ..Profile::default()
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: tunnelctl list");
    Ok(())
}
