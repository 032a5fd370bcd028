// ── System keyring session storage ──
//
// One keyring entry per (profile, key) under the "librarian" service.

use librarian_api::Error;
use librarian_core::SessionStorage;
use tracing::debug;

const KEYRING_SERVICE: &str = "librarian";

/// Session storage backed by the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringStorage {
    profile: String,
}

impl KeyringStorage {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, Error> {
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}/{key}", self.profile))
            .map_err(|e| keyring_error("access", &e))
    }
}

fn keyring_error(action: &str, err: &keyring::Error) -> Error {
    Error::Storage {
        message: format!("failed to {action} keyring entry: {err}"),
    }
}

impl SessionStorage for KeyringStorage {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keyring_error("read", &e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| keyring_error("write", &e))?;
        debug!(profile = %self.profile, "session saved to keyring");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error("delete", &e)),
        }
    }
}
