//! Config commands: `config init|show|path`. No appliance connection needed.

use serde::Serialize;

use pihole_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            password_env,
            store_password,
            default,
        } => {
            let mut cfg = pihole_config::load_config_or_default();
            let name = cfg.active_profile_name(global.profile.as_deref());

            let url = global
                .url
                .clone()
                .unwrap_or_else(|| pihole_config::DEFAULT_URL.to_owned());
            pihole_config::parse_url(&url)?;
            let password = if store_password {
                Some(rpassword::prompt_password(format!("Password for {url}: "))?)
            } else {
                None
            };

            let profile = cfg.profiles.entry(name.clone()).or_default();
            profile.url = url;
            if password_env.is_some() {
                profile.password_env = password_env;
                profile.password = None;
            }
            if password.is_some() {
                profile.password = password;
                profile.password_env = None;
            }
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            pihole_config::save_config(&cfg)?;
            output::print_output(
                &format!(
                    "Profile '{name}' saved to {}",
                    pihole_config::config_path().display()
                ),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = pihole_config::load_config()?;
            let masked = masked(&cfg);
            let out = output::render_single(
                &global.output,
                &masked,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &pihole_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct MaskedConfig {
    default_profile: Option<String>,
    profiles: std::collections::BTreeMap<String, Profile>,
}

/// Copy of the config with plaintext passwords replaced.
fn masked(cfg: &Config) -> MaskedConfig {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let mut p = p.clone();
            if p.password.is_some() {
                p.password = Some(MASK.into());
            }
            (name.clone(), p)
        })
        .collect();

    MaskedConfig {
        default_profile: cfg.default_profile.clone(),
        profiles,
    }
}
