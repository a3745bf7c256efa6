//! Error types for request signing.

/// Errors that can occur while signing an outgoing request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials are available for a signer that needs them.
    #[error("no credentials available for request signing")]
    MissingCredentials,

    /// The credential provider failed to produce credentials.
    #[error("credential provider failed: {0}")]
    Provider(String),

    /// A computed header value cannot be represented as an HTTP header.
    #[error("invalid value for header {name}: {reason}")]
    InvalidHeaderValue {
        /// The header being written.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A request header needed for signing is not valid UTF-8.
    #[error("header {0} is not valid UTF-8")]
    NonUtf8Header(String),

    /// The presign expiry is outside the range AWS accepts (1..=604800 seconds).
    #[error("invalid presign expiry: {0} seconds")]
    InvalidExpiry(u64),
}
