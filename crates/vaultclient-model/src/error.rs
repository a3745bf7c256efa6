//! Vault domain error codes.
//!
//! Vault reports failures either with AWS-style codes (`NoSuchEntity`,
//! `AccessDenied`, ...) or with its own legacy table of five codes that are
//! identified by a numeric status plus a fixed description.

use std::fmt;

use http::StatusCode;

/// Well-known Vault error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DomainErrorCode {
    // Legacy table
    /// Data entered by the user has a wrong format.
    WrongFormat,
    /// Authentication failed.
    Forbidden,
    /// The requested entity was not found.
    EntityDoesNotExist,
    /// The entity to create already exists.
    EntityAlreadyExists,
    /// Unknown server-side failure.
    ServiceFailure,

    /// Catch-all for transport failures and unrecognized error shapes.
    #[default]
    InternalError,

    // Server-defined codes
    /// Referenced entity does not exist.
    NoSuchEntity,
    /// An input parameter is out of range.
    InvalidParameterValue,
    /// The caller is not allowed to perform the action.
    AccessDenied,
    /// Unknown access key.
    InvalidAccessKeyId,
    /// Signature mismatch.
    SignatureDoesNotMatch,
    /// Client clock too far from the server clock.
    RequestTimeTooSkewed,
    /// Session token has expired.
    ExpiredToken,
    /// Session token is invalid.
    InvalidClientTokenId,
    /// Invalid argument.
    InvalidArgument,
    /// Invalid input.
    InvalidInput,
    /// Policy document could not be parsed.
    MalformedPolicyDocument,
    /// Required parameter missing.
    MissingParameter,
    /// Request failed validation.
    ValidationError,
    /// Account limits exceeded.
    LimitExceeded,
    /// Entity still has attached subordinate entities.
    DeleteConflict,
    /// Entity is temporarily unmodifiable.
    EntityTemporarilyUnmodifiable,
    /// Functionality not implemented by the server.
    NotImplemented,
    /// Temporary server failure.
    ServiceUnavailable,
}

impl DomainErrorCode {
    /// Every known code, legacy codes first.
    pub const ALL: [Self; 24] = [
        Self::WrongFormat,
        Self::Forbidden,
        Self::EntityDoesNotExist,
        Self::EntityAlreadyExists,
        Self::ServiceFailure,
        Self::InternalError,
        Self::NoSuchEntity,
        Self::InvalidParameterValue,
        Self::AccessDenied,
        Self::InvalidAccessKeyId,
        Self::SignatureDoesNotMatch,
        Self::RequestTimeTooSkewed,
        Self::ExpiredToken,
        Self::InvalidClientTokenId,
        Self::InvalidArgument,
        Self::InvalidInput,
        Self::MalformedPolicyDocument,
        Self::MissingParameter,
        Self::ValidationError,
        Self::LimitExceeded,
        Self::DeleteConflict,
        Self::EntityTemporarilyUnmodifiable,
        Self::NotImplemented,
        Self::ServiceUnavailable,
    ];

    /// Codes of the legacy `{code, message}` table.
    pub const LEGACY: [Self; 5] = [
        Self::WrongFormat,
        Self::Forbidden,
        Self::EntityDoesNotExist,
        Self::EntityAlreadyExists,
        Self::ServiceFailure,
    ];

    /// Returns the code string as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WrongFormat => "WrongFormat",
            Self::Forbidden => "Forbidden",
            Self::EntityDoesNotExist => "EntityDoesNotExist",
            Self::EntityAlreadyExists => "EntityAlreadyExists",
            Self::ServiceFailure => "ServiceFailure",
            Self::InternalError => "InternalError",
            Self::NoSuchEntity => "NoSuchEntity",
            Self::InvalidParameterValue => "InvalidParameterValue",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidAccessKeyId => "InvalidAccessKeyId",
            Self::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            Self::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            Self::ExpiredToken => "ExpiredToken",
            Self::InvalidClientTokenId => "InvalidClientTokenId",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidInput => "InvalidInput",
            Self::MalformedPolicyDocument => "MalformedPolicyDocument",
            Self::MissingParameter => "MissingParameter",
            Self::ValidationError => "ValidationError",
            Self::LimitExceeded => "LimitExceeded",
            Self::DeleteConflict => "DeleteConflict",
            Self::EntityTemporarilyUnmodifiable => "EntityTemporarilyUnmodifiable",
            Self::NotImplemented => "NotImplemented",
            Self::ServiceUnavailable => "ServiceUnavailable",
        }
    }

    /// Parse a wire code. Matching is exact.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> StatusCode {
        match self {
            Self::WrongFormat
            | Self::InvalidParameterValue
            | Self::ExpiredToken
            | Self::InvalidArgument
            | Self::InvalidInput
            | Self::MalformedPolicyDocument
            | Self::MissingParameter
            | Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::Forbidden
            | Self::AccessDenied
            | Self::InvalidAccessKeyId
            | Self::SignatureDoesNotMatch
            | Self::RequestTimeTooSkewed
            | Self::InvalidClientTokenId => StatusCode::FORBIDDEN,
            Self::EntityDoesNotExist | Self::NoSuchEntity => StatusCode::NOT_FOUND,
            Self::EntityAlreadyExists
            | Self::LimitExceeded
            | Self::DeleteConflict
            | Self::EntityTemporarilyUnmodifiable => StatusCode::CONFLICT,
            Self::ServiceFailure | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the default human-readable description.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::WrongFormat => "Data entered by the user has a wrong format.",
            Self::Forbidden => "Authentication failed.",
            Self::EntityDoesNotExist => "Not found.",
            Self::EntityAlreadyExists => {
                "The request was rejected because it attempted to create a resource that already exists."
            }
            Self::ServiceFailure => {
                "Server error: the request processing has failed because of an unknown error, exception or failure."
            }
            Self::InternalError => "We encountered an internal error. Please try again.",
            Self::NoSuchEntity => {
                "The request was rejected because it referenced an entity that does not exist."
            }
            Self::InvalidParameterValue => {
                "An invalid or out-of-range value was supplied for the input parameter."
            }
            Self::AccessDenied => "Access Denied",
            Self::InvalidAccessKeyId => {
                "The AWS access key Id you provided does not exist in our records."
            }
            Self::SignatureDoesNotMatch => {
                "The request signature we calculated does not match the signature you provided."
            }
            Self::RequestTimeTooSkewed => {
                "The difference between the request time and the server's time is too large."
            }
            Self::ExpiredToken => "The provided token has expired.",
            Self::InvalidClientTokenId => "The security token included in the request is invalid.",
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidInput => {
                "The request was rejected because an invalid or out-of-range value was supplied for an input parameter."
            }
            Self::MalformedPolicyDocument => {
                "The request was rejected because the policy document was malformed."
            }
            Self::MissingParameter => {
                "A required parameter for the specified action is not supplied."
            }
            Self::ValidationError => {
                "The input fails to satisfy the constraints specified by the service."
            }
            Self::LimitExceeded => {
                "The request was rejected because it attempted to create resources beyond the current account limits."
            }
            Self::DeleteConflict => {
                "The request was rejected because it attempted to delete a resource that has attached subordinate entities."
            }
            Self::EntityTemporarilyUnmodifiable => {
                "The request was rejected because it referenced an entity that is temporarily unmodifiable."
            }
            Self::NotImplemented => {
                "A header you provided implies functionality that is not implemented."
            }
            Self::ServiceUnavailable => {
                "The request has failed due to a temporary failure of the server."
            }
        }
    }

    /// Match a legacy `{code: <number>, message}` pair against the legacy table.
    ///
    /// Descriptions are compared with all whitespace removed, so servers that
    /// still send the historical run-together wording ("createa resource")
    /// are recognized too.
    #[must_use]
    pub fn from_legacy(status: u16, message: &str) -> Option<Self> {
        let wanted = strip_whitespace(message);
        Self::LEGACY.into_iter().find(|c| {
            c.default_status_code().as_u16() == status
                && strip_whitespace(c.default_message()) == wanted
        })
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

impl fmt::Display for DomainErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by (or on behalf of) the Vault server.
///
/// `status_code` is always the HTTP status of the response that produced the
/// error, or the code's default status for errors raised locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    /// The error code.
    pub code: DomainErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: StatusCode,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.code,
            self.status_code.as_u16(),
            self.message
        )
    }
}

impl std::error::Error for DomainError {}

impl DomainError {
    /// Create a `DomainError` with the code's default message and status.
    #[must_use]
    pub fn new(code: DomainErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.default_message().to_owned(),
            code,
        }
    }

    /// Create a `DomainError` with a custom message.
    #[must_use]
    pub fn with_message(code: DomainErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
        }
    }

    /// Replace the status code, keeping the code and message.
    #[must_use]
    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    /// Whether this error carries `code`.
    #[must_use]
    pub fn is(&self, code: DomainErrorCode) -> bool {
        self.code == code
    }

    // -- Convenience constructors --

    /// Internal error with a custom description.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(DomainErrorCode::InternalError, message)
    }
}

/// Create a `DomainError` from an error code.
///
/// # Examples
///
/// ```
/// use vaultclient_model::domain_error;
/// use vaultclient_model::error::DomainErrorCode;
///
/// let err = domain_error!(EntityAlreadyExists);
/// assert_eq!(err.code, DomainErrorCode::EntityAlreadyExists);
/// assert_eq!(err.status_code.as_u16(), 409);
///
/// let err = domain_error!(NoSuchEntity, "user bob not found");
/// assert_eq!(err.message, "user bob not found");
/// ```
#[macro_export]
macro_rules! domain_error {
    ($code:ident) => {
        $crate::error::DomainError::new($crate::error::DomainErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::DomainError::with_message($crate::error::DomainErrorCode::$code, $msg)
    };
}
