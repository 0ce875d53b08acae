//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Input, Password, Select};

use myuplink_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn require_terminal(action: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "interactive".into(),
            reason: format!("'{action}' needs an interactive terminal"),
        })
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Access token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "access_token".into(),
            reason: "access token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Effective config as TOML with secrets masked.
fn masked_toml(mut cfg: Config) -> Result<String, CliError> {
    for profile in cfg.profiles.values_mut() {
        if profile.access_token.is_some() {
            profile.access_token = Some(MASK.into());
        }
    }
    toml::to_string_pretty(&cfg).map_err(|e| CliError::Internal(format!("failed to render config: {e}")))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(masked_toml(cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { token } => {
            let cfg = config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);
            let token = match token {
                Some(token) => token,
                None => {
                    require_terminal("config set-token")?;
                    prompt_token()?
                }
            };
            config::store_access_token(&profile_name, &token)?;
            output::print_output(
                &format!("Access token stored in the system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    require_terminal("config init")?;

    let config_path = config::config_path();
    eprintln!("myUplink CLI configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    let language: String = Input::new()
        .with_prompt("Language for names and texts (blank for the API default)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let token = prompt_token()?;

    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the access token?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let access_token = if store_selection == 0 {
        config::store_access_token(&profile_name, &token)?;
        eprintln!("   Access token stored in system keyring");
        None
    } else {
        Some(token)
    };

    let profile = cfg.profiles.entry(profile_name.clone()).or_default();
    profile.access_token = access_token;
    profile.language = Some(language).filter(|l| !l.trim().is_empty());

    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    config::save_config(&cfg)?;
    eprintln!("\n   Profile '{profile_name}' saved to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use myuplink_config::Profile;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                access_token: Some("secret-token".into()),
                language: Some("sv-SE".into()),
                ..Profile::default()
            },
        );

        let rendered = masked_toml(cfg).unwrap();
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains(MASK));
        assert!(rendered.contains("sv-SE"));
    }
}
