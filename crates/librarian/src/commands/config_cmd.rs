//! Config subcommand handlers. None of these touch the network.

use dialoguer::{Input, Select};
use librarian_config::{self as config, Config, Profile, SessionBackend};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::available_profiles;
use crate::error::CliError;
use crate::output;

use super::util;

const CONFIG_KEYS: &str = "server, base_host, ca_cert, insecure, timeout, session_storage";

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_owned();
    if value.is_empty() { None } else { Some(value) }
}

fn apply(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => profile.server = optional(value),
        "base_host" | "base-host" => profile.base_host = optional(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = optional(value).map(Into::into),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "session_storage" | "session-storage" => profile.session_storage = value.parse()?,
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {CONFIG_KEYS}"),
            });
        }
    }
    Ok(())
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    eprintln!("librarian configuration wizard");
    eprintln!("   Config path: {}\n", config::config_path().display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(cfg.active_profile_name(global.profile.as_deref()))
        .interact_text()
        .map_err(util::prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(&format!("Overwrite profile '{profile_name}'?"), global.yes)?
    {
        return Ok(());
    }

    let server: String = Input::new()
        .with_prompt("Server URL")
        .default("http://localhost:3000".into())
        .interact_text()
        .map_err(util::prompt_err)?;

    let base_host: String = Input::new()
        .with_prompt("API base host (blank to use the server)")
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)?;

    let storage_choices = &[
        "File in the data directory (default)",
        "System keyring",
        "Don't persist sessions",
    ];
    let session_storage = match Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(storage_choices)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?
    {
        1 => SessionBackend::Keyring,
        2 => SessionBackend::Memory,
        _ => SessionBackend::File,
    };

    let profile = Profile {
        server: optional(server),
        base_host: optional(base_host),
        session_storage,
        ..Profile::default()
    };
    // Validate before writing anything.
    config::profile_to_librarian_config(&profile, &cfg.defaults)?;

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: librarian auth login");
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let out = output::render_single(
        &global.output,
        &cfg,
        |c: &Config| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
        |c| c.profile_names().join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => show(global),

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = cfg.active_profile_name(global.profile.as_deref());

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            apply(profile, &key, value)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: librarian config init");
            } else {
                for name in cfg.profile_names() {
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
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn apply_sets_known_keys() {
        let mut profile = Profile::default();
        apply(&mut profile, "base-host", "http://localhost:3000".into()).unwrap();
        apply(&mut profile, "timeout", "12".into()).unwrap();
        apply(&mut profile, "session_storage", "memory".into()).unwrap();
        apply(&mut profile, "server", "  ".into()).unwrap();

        assert_eq!(profile.base_host.as_deref(), Some("http://localhost:3000"));
        assert_eq!(profile.timeout, Some(12));
        assert_eq!(profile.session_storage, SessionBackend::Memory);
        assert_eq!(profile.server, None);
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut profile = Profile::default();
        assert!(apply(&mut profile, "timeout", "soon".into()).is_err());
        assert!(apply(&mut profile, "session_storage", "vault".into()).is_err());
        assert!(matches!(
            apply(&mut profile, "color", "red".into()),
            Err(CliError::Validation { .. })
        ));
    }
}
