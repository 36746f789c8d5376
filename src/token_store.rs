//! Session storage: an injected key/value store plus the key layout on top of it

use crate::error::{ClientError, Result};
use crate::types::Session;
use papaya::HashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the signed-in admin's id
pub const ADMIN_ID_KEY: &str = "adminId";

const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ADMIN_ID_KEY];

/// Persistent key/value backend for session data
///
/// Reads and writes never fail from the caller's point of view, the same way a
/// browser's local storage behaves. Backends that can fail log and carry on.
pub trait SessionStore: Send + Sync + 'static {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str);

    /// Delete a value
    fn remove(&self, key: &str);

    /// Delete several values as one write
    fn remove_all(&self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }
}

/// In-memory store using Papaya HashMap
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.pin().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.pin().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.pin().remove(key);
    }
}

/// JSON-file-backed store
///
/// The whole map is rewritten on every change: written to a sibling temp
/// file, then renamed over the old one so a crash never leaves half a file.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                ClientError::Storage(format!("Corrupt session file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), keys = values.len(), "Opened session file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Open the store at the platform data directory (`<data_dir>/grupopaz/session.json`)
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| ClientError::Storage("No data directory on this platform".to_string()))?;
        Self::open(dir.join("grupopaz").join("session.json"))
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self, values: &BTreeMap<String, String>) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(values)?;
            let tmp = self.tmp_path();
            std::fs::write(&tmp, contents)?;
            std::fs::rename(&tmp, &self.path)
        };

        if let Err(e) = write() {
            warn!(path = %self.path.display(), error = %e, "Failed to write session file");
        }
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *values);
        self.persist(&*values);
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|values| {
            values.remove(key);
        });
    }

    fn remove_all(&self, keys: &[&str]) {
        self.update(|values| {
            for key in keys {
                values.remove(*key);
            }
        });
    }
}

/// Session token storage on top of a [`SessionStore`]
///
/// Owns the key layout: access token, refresh token and admin id.
#[derive(Clone)]
pub struct TokenStore<S> {
    store: S,
}

impl<S: SessionStore> TokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the access token
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Get the refresh token
    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Id of the signed-in admin
    pub fn admin_id(&self) -> Option<String> {
        self.store.get(ADMIN_ID_KEY)
    }

    /// Store both tokens
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access_token);
        self.store.set(REFRESH_TOKEN_KEY, refresh_token);
    }

    /// Replace only the access token
    pub fn set_access_token(&self, access_token: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access_token);
    }

    /// Remember which admin is signed in
    pub fn set_admin_id(&self, admin_id: &str) {
        self.store.set(ADMIN_ID_KEY, admin_id);
    }

    /// Write a whole session
    pub fn store_session(&self, session: &Session) {
        self.set_tokens(&session.access_token, &session.refresh_token);
        self.set_admin_id(&session.admin_id);
    }

    /// The stored session, if all three keys are present
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            admin_id: self.admin_id()?,
        })
    }

    /// Remove every session key
    pub fn clear(&self) {
        self.store.remove_all(&SESSION_KEYS);
    }

    /// The underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }
}
