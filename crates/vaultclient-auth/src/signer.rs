//! The signer abstraction shared by every authentication scheme.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};

use crate::error::AuthError;

/// A fully-built outgoing request as seen by a signer.
///
/// `path` and `query` hold the exact encoded strings that will be written on
/// the wire; `authority` is the `host[:port]` value of the `Host` header.
#[derive(Debug, Clone)]
pub struct SignableRequest {
    /// HTTP method.
    pub method: Method,
    /// `host[:port]` the request is addressed to.
    pub authority: String,
    /// Encoded path, starting with `/`.
    pub path: String,
    /// Encoded query string without the leading `?`.
    pub query: String,
    /// Request headers. Signers add their own headers here.
    pub headers: HeaderMap,
    /// Final request body.
    pub body: Bytes,
}

impl SignableRequest {
    /// Create a request with no query, headers or body.
    pub fn new(method: Method, authority: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            authority: authority.into(),
            path: path.into(),
            query: String::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set a header, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidHeaderValue`] if `value` contains bytes that
    /// are not allowed in a header.
    pub fn set_header(&mut self, name: &'static str, value: &str) -> Result<(), AuthError> {
        let header_value =
            HeaderValue::from_str(value).map_err(|e| AuthError::InvalidHeaderValue {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;
        self.headers
            .insert(HeaderName::from_static(name), header_value);
        Ok(())
    }

    /// Read a header as UTF-8, if present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NonUtf8Header`] when the value is not valid UTF-8.
    pub fn header_str(&self, name: &str) -> Result<Option<&str>, AuthError> {
        self.headers
            .get(name)
            .map(|v| v.to_str().map_err(|_| AuthError::NonUtf8Header(name.to_owned())))
            .transpose()
    }

    /// Append one already-encoded `key=value` pair to the query string.
    pub fn push_query_pair(&mut self, key: &str, value: &str) {
        if !self.query.is_empty() {
            self.query.push('&');
        }
        self.query.push_str(key);
        self.query.push('=');
        self.query.push_str(value);
    }
}

/// Something that can authenticate an outgoing request.
///
/// Signing is async so that implementations may fetch keys or call out to a
/// crypto service. It runs after the body is final and before the request is
/// handed to the transport.
#[async_trait::async_trait]
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// Short scheme name used in logs (for example `"sigv4"`).
    fn scheme(&self) -> &'static str;

    /// Authenticate `request` in place.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when credentials are missing or a computed
    /// value cannot be written into the request.
    async fn sign(&self, request: &mut SignableRequest) -> Result<(), AuthError>;
}

/// Forwards an OIDC/web-identity token as `Authorization: Bearer <token>`.
///
/// The server resolves the identity from the token itself, so no key
/// material is involved.
#[derive(Clone)]
pub struct BearerTokenSigner {
    token: String,
}

impl BearerTokenSigner {
    /// Create a signer forwarding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenSigner")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
impl RequestSigner for BearerTokenSigner {
    fn scheme(&self) -> &'static str {
        "bearer"
    }

    async fn sign(&self, request: &mut SignableRequest) -> Result<(), AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        request.set_header("authorization", &format!("Bearer {}", self.token))
    }
}
