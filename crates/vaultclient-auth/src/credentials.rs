//! Credential container and provider trait.
//!
//! Signers never hold a secret directly; they ask a [`CredentialProvider`]
//! for the current [`Credentials`] each time they sign.

use std::fmt;

use crate::error::AuthError;

/// An access key / secret key pair, optionally with a session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key id (sent in clear in the credential scope).
    pub access_key_id: String,
    /// The secret access key used for HMAC derivation.
    pub secret_access_key: String,
    /// Temporary-credential session token, forwarded as `x-amz-security-token`.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of signing credentials.
///
/// Implementations may back this with a configuration file, an environment
/// lookup or a refreshing token store.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Return the credentials to sign the next request with.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] or [`AuthError::Provider`]
    /// when no usable credentials exist.
    fn credentials(&self) -> Result<Credentials, AuthError>;
}

/// A provider that always returns the same credentials.
///
/// # Examples
///
/// ```
/// use vaultclient_auth::credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(Credentials::new("AKID", "secret"));
/// assert_eq!(provider.credentials().unwrap().access_key_id, "AKID");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    /// Wrap a fixed set of credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        if self.credentials.access_key_id.is_empty() || self.credentials.secret_access_key.is_empty()
        {
            return Err(AuthError::MissingCredentials);
        }
        Ok(self.credentials.clone())
    }
}
