mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use myuplink_api::{StaticToken, TransportConfig};
use myuplink_config::{ConfigError, Profile};
use myuplink_core::{ClientConfig, Controller};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need an API connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "myuplink", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let controller = build_controller(&cli.global)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &controller, &cli.global).await
        }
    }
}

/// Build a `Controller` from the config file, the active profile and CLI
/// overrides.
///
/// Without a config file the implicit `default` profile is used, so
/// `--token` alone is enough to talk to the API.
fn build_controller(global: &GlobalOpts) -> Result<Controller, CliError> {
    let cfg = myuplink_config::load_config()?;

    let (profile_name, profile) = match myuplink_config::select_profile(&cfg, global.profile.as_deref()) {
        Ok((name, profile)) => (name, profile.clone()),
        Err(ConfigError::UnknownProfile { profile }) if global.profile.is_none() => {
            (profile, Profile::default())
        }
        Err(ConfigError::UnknownProfile { profile }) => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut transport = myuplink_config::profile_to_transport(&profile, &cfg.defaults)?;
    if let Some(raw) = &global.base_url {
        transport.base_url = TransportConfig::with_base_url(raw)
            .map_err(|_| CliError::Validation {
                field: "base-url".into(),
                reason: format!("invalid URL: {raw}"),
            })?
            .base_url;
    }
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }

    let mut client_config = ClientConfig::from(&profile.client_options());
    if let Some(language) = &global.language {
        client_config.language = Some(language.clone());
    }

    let token = match &global.token {
        Some(token) => SecretString::from(token.clone()),
        None => myuplink_config::resolve_access_token(&profile, &profile_name)?,
    };

    tracing::debug!(profile = %profile_name, url = %transport.base_url, "connecting");
    Ok(Controller::connect(
        transport,
        Arc::new(StaticToken::new(token)),
        client_config,
    )?)
}
