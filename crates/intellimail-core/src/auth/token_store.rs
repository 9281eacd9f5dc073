//! Durable storage for the current session's credential material.
//!
//! Two values are kept: the bearer `access_token` and the identity token
//! (stored under `auth_token`). The `TokenStore` never surfaces storage
//! failures to its callers: when the backend breaks it keeps serving a
//! memory copy for the rest of the process lifetime.

use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Keychain entry names for the two stored values
const ACCESS_TOKEN_KEY: &str = "access_token";
const IDENTITY_TOKEN_KEY: &str = "auth_token";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is corrupt: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Keychain unavailable: {0}")]
    Keyring(#[from] keyring::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "auth_token", default, skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, identity_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            identity_token,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.identity_token.is_none()
    }
}

/// A place the token pair can be persisted.
pub trait StorageBackend: Send + Sync {
    fn read(&self) -> Result<StoredTokens, StorageError>;
    fn write(&self, tokens: &StoredTokens) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

// ============================================================================
// Backends
// ============================================================================

/// JSON document in the per-user cache directory.
pub struct FileStorage {
    cache_dir: PathBuf,
}

impl FileStorage {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<StoredTokens, StorageError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(StoredTokens::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// OS keychain, one entry per stored value.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match Entry::new(&self.service, key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        let entry = Entry::new(&self.service, key)?;
        match value {
            Some(value) => entry.set_password(value)?,
            None => match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

impl StorageBackend for KeyringStorage {
    fn read(&self) -> Result<StoredTokens, StorageError> {
        Ok(StoredTokens {
            access_token: self.get(ACCESS_TOKEN_KEY)?,
            identity_token: self.get(IDENTITY_TOKEN_KEY)?,
        })
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        self.set(ACCESS_TOKEN_KEY, tokens.access_token.as_deref())?;
        self.set(IDENTITY_TOKEN_KEY, tokens.identity_token.as_deref())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.set(ACCESS_TOKEN_KEY, None)?;
        self.set(IDENTITY_TOKEN_KEY, None)
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    tokens: Mutex<StoredTokens>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<StoredTokens, StorageError> {
        Ok(self.tokens.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = tokens.clone();
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = StoredTokens::default();
        }
        Ok(())
    }
}

// ============================================================================
// Token Store
// ============================================================================

#[derive(Default)]
struct Mirror {
    tokens: StoredTokens,
    /// Set once the backend has failed; the mirror is authoritative from then on.
    degraded: bool,
}

pub struct TokenStore {
    backend: Box<dyn StorageBackend>,
    mirror: Mutex<Mirror>,
}

impl TokenStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            mirror: Mutex::new(Mirror::default()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Persist a new token pair, replacing whatever was stored.
    pub fn save(&self, access_token: &str, identity_token: Option<&str>) {
        let tokens = StoredTokens::new(access_token, identity_token.map(str::to_string));
        let result = self.backend.write(&tokens);
        self.with_mirror(|mirror| {
            mirror.tokens = tokens;
            if let Err(ref e) = result {
                warn!(error = %e, "Token storage unavailable, session is memory-only");
                mirror.degraded = true;
            }
        });
        debug!(
            identity_token = if identity_token.is_some() { "present" } else { "missing" },
            "Tokens saved"
        );
    }

    pub fn load(&self) -> StoredTokens {
        if let Some(tokens) = self.degraded_tokens() {
            return tokens;
        }
        match self.backend.read() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Failed to read token storage, session is memory-only");
                self.with_mirror(|mirror| {
                    mirror.degraded = true;
                    mirror.tokens.clone()
                })
                .unwrap_or_default()
            }
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.load().access_token
    }

    pub fn clear(&self) {
        let result = self.backend.remove();
        self.with_mirror(|mirror| {
            mirror.tokens = StoredTokens::default();
            if let Err(ref e) = result {
                // Stale tokens may still sit in the backend; stop reading it.
                warn!(error = %e, "Failed to clear token storage");
                mirror.degraded = true;
            }
        });
        debug!("Tokens cleared");
    }

    /// True once the durable backend has failed during this process lifetime
    pub fn is_degraded(&self) -> bool {
        self.with_mirror(|mirror| mirror.degraded).unwrap_or(true)
    }

    fn degraded_tokens(&self) -> Option<StoredTokens> {
        self.with_mirror(|mirror| mirror.degraded.then(|| mirror.tokens.clone()))
            .flatten()
    }

    fn with_mirror<R>(&self, f: impl FnOnce(&mut Mirror) -> R) -> Option<R> {
        self.mirror.lock().ok().map(|mut guard| f(&mut guard))
    }
}
