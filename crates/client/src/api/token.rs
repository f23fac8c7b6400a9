//! Bearer token sources.
//!
//! The API client asks its [`TokenProvider`] for a token on every request, so
//! a sign-in or sign-out that happens while the client is alive is picked up
//! by the next call.

use secrecy::SecretString;

/// Supplies the bearer token for authenticated requests.
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when signed out.
    fn token(&self) -> Option<SecretString>;
}

/// A fixed token (or none at all).
#[derive(Clone, Default)]
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    /// Always return `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(SecretString::from(token.into())))
    }

    /// Never return a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<SecretString> {
        self.0.clone()
    }
}
