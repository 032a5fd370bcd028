//! Flag-aware configuration: merges `GlobalOpts` over the active profile
//! and builds the `Librarian` context.
//!
//! Precedence for every setting is flag (or its `LIBRARIAN_*` env var) >
//! profile > defaults.

use librarian_config::{
    Config, Profile, SessionBackend, config_path, open_session_storage,
    profile_to_librarian_config,
};
use librarian_core::{Librarian, LibrarianConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything needed to open a session for one invocation.
#[derive(Debug)]
pub struct Resolved {
    pub profile: String,
    pub config: LibrarianConfig,
    pub session_storage: SessionBackend,
}

/// Overlay CLI flags on the active profile.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // Naming a profile that doesn't exist is a mistake; an absent
        // default profile just means "flags only".
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => Profile::default(),
    };

    if let Some(ref server) = global.server {
        profile.server = Some(server.clone());
    }
    if let Some(ref base_host) = global.base_host {
        profile.base_host = Some(base_host.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let config = profile_to_librarian_config(&profile, &cfg.defaults)?;
    if config.origin.is_none() && config.base_host.is_none() {
        return Err(CliError::NoServer {
            profile: profile_name,
            path: config_path().display().to_string(),
        });
    }

    Ok(Resolved {
        profile: profile_name,
        config,
        session_storage: profile.session_storage,
    })
}

/// Load config, resolve the profile and restore its session.
pub fn connect(global: &GlobalOpts) -> Result<Librarian, CliError> {
    let cfg = librarian_config::load_config()?;
    let resolved = resolve(global, &cfg)?;

    tracing::debug!(
        profile = %resolved.profile,
        storage = ?resolved.session_storage,
        "resolved profile"
    );

    let storage = open_session_storage(resolved.session_storage, &resolved.profile);
    Ok(Librarian::new(resolved.config, storage)?)
}

pub fn available_profiles(cfg: &Config) -> String {
    let names = cfg.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
