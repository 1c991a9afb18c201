//! Persistent key-value session storage.
//!
//! The logged-in user's fields are kept as independent string entries in a
//! small JSON file, with no transactional grouping and no schema versioning.
//! Mutations update memory first and write through to disk best-effort: a
//! failed write is logged, never surfaced, so session reads keep working.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Well-known session keys.
pub mod keys {
    /// Bearer token of the logged-in user.
    pub const TOKEN: &str = "token";
    /// Refresh token (stored, never rotated by this client).
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Account role.
    pub const ROLE: &str = "role";
    /// Account email.
    pub const EMAIL: &str = "email";
    /// Display name.
    pub const NAME: &str = "name";
    /// Phone number.
    pub const PHONE: &str = "phone";
}

/// Errors that can occur when loading the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide session store.
///
/// Cheaply cloneable; all clones share the same entries.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl SessionStore {
    /// Open a session store backed by a JSON file.
    ///
    /// A missing file starts an empty session. A file that exists but does
    /// not parse is treated as corrupt: it is logged and replaced on the
    /// next write, since losing a session is recoverable and refusing to
    /// start is not.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let values = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Session file is corrupt, starting with an empty session"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SessionError::Io(e)),
        };

        Ok(Self {
            inner: Arc::new(SessionInner {
                path: Some(path.to_path_buf()),
                values: Mutex::new(values),
            }),
        })
    }

    /// Create a store with no backing file. Used in tests and anywhere
    /// persistence across runs is not wanted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                path: None,
                values: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Read a single entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Write a single entry.
    pub fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_owned(), value.to_owned());
        self.persist();
    }

    /// Write an entry only when it is not already present.
    pub fn set_if_absent(&self, key: &str, value: &str) {
        let inserted = {
            let mut values = self.lock();
            if values.contains_key(key) {
                false
            } else {
                values.insert(key.to_owned(), value.to_owned());
                true
            }
        };
        if inserted {
            self.persist();
        }
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &str) {
        let removed = self.lock().remove(key).is_some();
        if removed {
            self.persist();
        }
    }

    /// Remove every entry in the store, not just the well-known keys.
    pub fn clear(&self) {
        self.lock().clear();
        self.persist();
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.inner
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the current entries to the backing file, if any.
    fn persist(&self) {
        let Some(path) = &self.inner.path else {
            return;
        };

        let serialized = {
            let values = self.lock();
            serde_json::to_string_pretty(&*values)
        };

        let result = serialized
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));

        if let Err(e) = result {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to persist session file"
            );
        }
    }
}
