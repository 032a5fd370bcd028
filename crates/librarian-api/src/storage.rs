// Durable key-value storage for the session
//
// The auth store persists exactly one entry (`SESSION_KEY`) through this
// interface. Backends that touch the OS keyring live in `librarian-config`;
// the in-memory and JSON-file backends live here.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::Error;

/// Fixed key the session is persisted under.
pub const SESSION_KEY: &str = "librarian.auth";

/// A pluggable durable key-value store.
///
/// Methods are called synchronously from async code and should return
/// quickly; implementations may block on local I/O.
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

fn storage_error(message: impl Into<String>) -> Error {
    Error::Storage {
        message: message.into(),
    }
}

// ── In-memory ───────────────────────────────────────────────────────

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> Result<R, Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| storage_error("memory storage lock poisoned"))?;
        Ok(f(&mut entries))
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        self.with_entries(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

// ── JSON file ───────────────────────────────────────────────────────

/// Stores entries as a flat JSON object in a single file.
///
/// The file is read and rewritten on every mutation; it is deleted once
/// the last entry is removed. Writes go through a sibling temp file that is
/// renamed into place, and on unix the file is only readable by its owner.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn parse(&self, raw: &str) -> Result<BTreeMap<String, String>, Error> {
        serde_json::from_str(raw)
            .map_err(|e| storage_error(format!("corrupt session file {}: {e}", self.path.display())))
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, Error> {
        match self.read_raw()? {
            Some(raw) => self.parse(&raw),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Entries to start a mutation from. A corrupt file is replaced; any
    /// other read failure aborts so existing entries are never clobbered.
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, Error> {
        let Some(raw) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        Ok(self.parse(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "replacing corrupt session file");
            BTreeMap::new()
        }))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error(format!(
                    "failed to remove {}: {e}",
                    self.path.display()
                ))),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                storage_error(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| storage_error(format!("failed to encode session file: {e}")))?;

        let temp = self.temp_path();
        write_private(&temp, json.as_bytes())
            .and_then(|()| fs::rename(&temp, &self.path))
            .map_err(|e| {
                let _ = fs::remove_file(&temp);
                storage_error(format!("failed to write {}: {e}", self.path.display()))
            })
    }
}

/// Create or truncate `path` with owner-only permissions and write `contents`.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_entries()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.entries_for_update()?;
        entries.remove(key);
        self.write_entries(&entries)
    }
}
