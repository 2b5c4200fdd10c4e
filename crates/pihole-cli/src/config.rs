//! CLI-specific configuration: global flag overrides on top of the
//! shared `pihole-config` profiles.

use std::io::IsTerminal;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use pihole_api::{ClientConfig, TlsMode};
use pihole_config::{Config, Profile};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Output format: `--output` / `PIHOLE_OUTPUT`, then `defaults.output`
/// from the config file, then a table.
pub fn resolve_output(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    if let Some(ref format) = global.output_flag {
        return format.clone();
    }
    OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or_else(|_| {
        tracing::warn!(output = %cfg.defaults.output, "unknown output format in config, using table");
        OutputFormat::Table
    })
}

/// Build a `ClientConfig` from the loaded config, profile, and CLI overrides.
///
/// Precedence: flags / `PIHOLE_*` env vars, then the active profile, then
/// built-in defaults. Without any password source an interactive terminal
/// gets a prompt.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::Validation {
                field: "profile".into(),
                reason: format!("profile '{profile_name}' not found in configuration"),
            });
        }
        None => Profile::default(),
    };

    let url = pihole_config::parse_url(global.url.as_deref().unwrap_or(&profile.url))?;

    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => match pihole_config::resolve_password(&profile, &profile_name) {
            Ok(pw) => pw,
            Err(pihole_config::ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
                prompt_password(&url)?
            }
            Err(e) => return Err(e.into()),
        },
    };

    let mut transport = pihole_config::profile_transport(&profile, &cfg.defaults);
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }

    Ok(ClientConfig {
        url,
        password,
        transport,
    })
}

fn prompt_password(url: &url::Url) -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password(format!("Password for {url}: "))?;
    Ok(SecretString::from(pw))
}
