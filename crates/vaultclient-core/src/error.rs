//! Client error types.

use http::StatusCode;
use vaultclient_model::{DomainError, DomainErrorCode};

/// Everything a Vault call can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VaultClientError {
    /// The input was rejected before any request was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The server (or the transport on its behalf) reported an error.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A successful response body could not be decoded.
    #[error("cannot decode vault response ({status}): {message}")]
    Decode {
        /// HTTP status of the response.
        status: StatusCode,
        /// Parser error.
        message: String,
        /// The undecodable payload, lossily converted to UTF-8.
        raw: String,
    },
}

impl VaultClientError {
    /// Shorthand for [`VaultClientError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The domain error, if this is one.
    #[must_use]
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is a domain error with `code`.
    #[must_use]
    pub fn is_code(&self, code: DomainErrorCode) -> bool {
        self.domain().is_some_and(|err| err.is(code))
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Domain(err) => Some(err.status_code),
            Self::Decode { status, .. } => Some(*status),
            Self::InvalidArgument(_) | Self::Config(_) => None,
        }
    }
}

/// Convenience result alias.
pub type VaultResult<T> = Result<T, VaultClientError>;

/// Socket-level failures. These never reach callers directly: the client
/// logs them and reports an `InternalError`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The TCP or TLS connection could not be established.
    #[error("cannot connect to vault: {0}")]
    Connect(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("vault request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The request could not be written or the response head was not received.
    #[error("vault request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read to the end.
    #[error("cannot read vault response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl TransportError {
    /// Classify an error returned while sending a request.
    #[must_use]
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Request(err)
        }
    }

    /// This error followed by each underlying cause, joined with `: `.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self).and_then(std::error::Error::source);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = std::error::Error::source(err);
        }
        message
    }

    /// Classify an error returned while reading the response body.
    #[must_use]
    pub fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Body(err)
        }
    }
}

impl From<TransportError> for DomainError {
    fn from(_: TransportError) -> Self {
        DomainError::new(DomainErrorCode::InternalError)
    }
}
