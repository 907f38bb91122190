//! Bearer token persistence.
//!
//! The API client asks its [`TokenStore`] for the token on every request, so
//! signing in or out takes effect immediately for all stores sharing it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from persisting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Source of the bearer token attached to API requests.
pub trait TokenStore: Send + Sync {
    /// The current token, if signed in.
    fn token(&self) -> Option<SecretString>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted.
    fn set_token(&self, token: SecretString) -> Result<(), SessionError>;

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

/// Token held only for the lifetime of the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        Ok(())
    }
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Token persisted as JSON in a file, kept in memory after the first read.
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<SecretString>>,
}

impl FileTokenStore {
    /// Open the store, reading any token already saved at `path`.
    ///
    /// A missing file means "signed out".
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let cached = match fs::read_to_string(&path) {
            Ok(contents) => {
                let session: SessionFile = serde_json::from_str(&contents)?;
                Some(session.token)
                    .filter(|token| !token.trim().is_empty())
                    .map(SecretString::from)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, token: &str) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(&SessionFile {
            token: token.to_string(),
        })?;
        fs::write(&self.path, contents).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(io_err)?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.cached.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        self.write_file(token.expose_secret())?;
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(token);
        }
        tracing::info!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        }
        if let Ok(mut guard) = self.cached.write() {
            *guard = None;
        }
        tracing::info!(path = %self.path.display(), "Session token cleared");
        Ok(())
    }
}
