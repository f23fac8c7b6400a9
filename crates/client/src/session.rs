//! Signed-in user and auth token, as persisted by the storefront.
//!
//! The session file is written by the sign-in flow and only read here:
//!
//! ```json
//! {
//!   "user": { "userId": "665f1c2ab4", "name": "Asha Rao", "email": "asha@example.com" },
//!   "token": "eyJhbGciOi..."
//! }
//! ```
//!
//! [`FileSessionStore`] re-reads the file on every access, so signing in or
//! out in another process takes effect on the next request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;
use shopfront_core::CurrentUser;
use thiserror::Error;

use crate::api::TokenProvider;

/// Errors that can occur when reading the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file exists but could not be read.
    #[error("Failed to read session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session file is not valid session JSON.
    #[error("Invalid session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No user is signed in.
    #[error("Not signed in")]
    NotSignedIn,
}

/// Read access to the persisted session.
pub trait SessionStore: TokenProvider {
    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    fn current_user(&self) -> Result<Option<CurrentUser>, SessionError>;

    /// The signed-in user, failing with [`SessionError::NotSignedIn`] when
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is signed in or the session cannot be read.
    fn require_user(&self) -> Result<CurrentUser, SessionError> {
        self.current_user()?.ok_or(SessionError::NotSignedIn)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SessionFile {
    #[serde(default)]
    user: Option<CurrentUser>,
    #[serde(default)]
    token: Option<String>,
}

// =============================================================================
// FileSessionStore
// =============================================================================

/// Session store backed by a JSON file.
///
/// A missing file means signed out.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionFile, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default());
            }
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| SessionError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl TokenProvider for FileSessionStore {
    fn token(&self) -> Option<SecretString> {
        match self.read() {
            Ok(session) => session
                .token
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session; treating as signed out");
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn current_user(&self) -> Result<Option<CurrentUser>, SessionError> {
        Ok(self.read()?.user)
    }
}

// =============================================================================
// InMemorySession
// =============================================================================

/// A fixed session held in memory.
#[derive(Clone, Default)]
pub struct InMemorySession {
    user: Option<CurrentUser>,
    token: Option<SecretString>,
}

impl InMemorySession {
    /// A signed-in session.
    #[must_use]
    pub fn signed_in(user: CurrentUser, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(SecretString::from(token.into())),
        }
    }

    /// A signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Share this session as both store and token provider.
    #[must_use]
    pub fn shared(self) -> (Arc<dyn SessionStore>, Arc<dyn TokenProvider>) {
        let session = Arc::new(self);
        let store: Arc<dyn SessionStore> = session.clone();
        let tokens: Arc<dyn TokenProvider> = session;
        (store, tokens)
    }
}

impl std::fmt::Debug for InMemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySession")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TokenProvider for InMemorySession {
    fn token(&self) -> Option<SecretString> {
        self.token.clone()
    }
}

impl SessionStore for InMemorySession {
    fn current_user(&self) -> Result<Option<CurrentUser>, SessionError> {
        Ok(self.user.clone())
    }
}
