//! Request authentication.
//!
//! The [`Authenticator`] decides whether an operation is signed and runs the
//! configured [`RequestSigner`] over the finished request. Signing overrides
//! sign a copy addressed to the override host/path; only the resulting
//! headers and query travel back to the real request.

use std::sync::Arc;

use http::HeaderMap;
use tracing::debug;
use vaultclient_auth::{
    BearerTokenSigner, CredentialProvider, Credentials, PresignedV4Signer, RequestSigner,
    SigV2Signer, SigV4Signer, SignableRequest, StaticCredentialProvider, hash_payload,
};
use vaultclient_model::{AuthRequirement, DomainError, DomainErrorCode};

use crate::config::{AuthScheme, ClientConfig};
use crate::error::VaultResult;
use crate::request::BuiltRequest;

/// Service name in the SigV4 credential scope.
pub const SIGNING_SERVICE: &str = "iam";

/// Headers and query produced by signing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignedParts {
    /// Headers to send, including the signer's own.
    pub headers: HeaderMap,
    /// Final query string without the leading `?`.
    pub query: String,
}

/// Signs requests according to the client configuration.
#[derive(Debug, Clone)]
pub struct Authenticator {
    signer: Arc<dyn RequestSigner>,
    admin_routes: bool,
    authority: String,
    signing_host: Option<String>,
    signing_path: Option<String>,
    payload_hash_header: bool,
}

impl Authenticator {
    /// Build the signer selected by `config.auth_scheme`.
    ///
    /// # Errors
    ///
    /// Returns `VaultClientError::Config` when the endpoint address does not
    /// parse.
    pub fn from_config(config: &ClientConfig) -> VaultResult<Self> {
        let mut credentials = Credentials::new(
            config.access_key.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
        );
        if let Some(token) = &config.session_token {
            credentials = credentials.with_session_token(token.clone());
        }
        let provider: Arc<dyn CredentialProvider> =
            Arc::new(StaticCredentialProvider::new(credentials));
        let region = config.effective_region();

        let signer: Arc<dyn RequestSigner> = match config.auth_scheme {
            AuthScheme::SigV4 => Arc::new(SigV4Signer::from_shared(
                provider,
                region,
                SIGNING_SERVICE,
            )),
            AuthScheme::SigV4Presigned => Arc::new(PresignedV4Signer::new(
                provider,
                region,
                SIGNING_SERVICE,
            )),
            AuthScheme::SigV2 => Arc::new(SigV2Signer::new(provider)),
            AuthScheme::BearerToken => Arc::new(BearerTokenSigner::new(
                config.bearer_token.clone().unwrap_or_default(),
            )),
        };

        let mut authenticator = Self::with_signer(config, signer)?;
        authenticator.payload_hash_header = config.auth_scheme == AuthScheme::SigV4;
        Ok(authenticator)
    }

    /// Use a caller-provided signer.
    pub fn with_signer(
        config: &ClientConfig,
        signer: Arc<dyn RequestSigner>,
    ) -> VaultResult<Self> {
        Ok(Self {
            signer,
            admin_routes: config.admin_routes_require_auth,
            authority: config.authority()?,
            signing_host: config.signing_host.clone(),
            signing_path: config.signing_path.clone(),
            payload_hash_header: false,
        })
    }

    /// A copy that also signs admin routes.
    #[must_use]
    pub fn with_admin_routes(mut self, enabled: bool) -> Self {
        self.admin_routes = enabled;
        self
    }

    /// Whether admin routes are signed.
    #[must_use]
    pub fn admin_routes(&self) -> bool {
        self.admin_routes
    }

    /// Whether an operation with `requirement` must be signed.
    #[must_use]
    pub fn requires_signing(&self, requirement: AuthRequirement) -> bool {
        match requirement {
            AuthRequirement::None => false,
            AuthRequirement::AdminRoute => self.admin_routes,
            AuthRequirement::Always => true,
        }
    }

    /// Produce the headers and query to send `request` with.
    ///
    /// Unsigned operations get the base headers and the request's own query.
    ///
    /// # Errors
    ///
    /// Any signing failure becomes an `InternalError`; the request must not be
    /// sent.
    pub async fn authenticate(&self, request: &BuiltRequest) -> Result<SignedParts, DomainError> {
        let mut signable = SignableRequest::new(
            request.method.clone(),
            self.authority.clone(),
            request.path.clone(),
        );
        signable.query.clone_from(&request.query);
        signable.body = request.body.clone();
        if let Some(content_type) = request.content_type {
            signable
                .set_header("content-type", content_type)
                .map_err(signing_failed)?;
        }

        if !self.requires_signing(request.operation.descriptor().auth) {
            return Ok(SignedParts {
                headers: signable.headers,
                query: signable.query,
            });
        }

        if self.payload_hash_header {
            signable
                .set_header("x-amz-content-sha256", &hash_payload(&request.body))
                .map_err(signing_failed)?;
        }

        if self.signing_host.is_none() && self.signing_path.is_none() {
            self.signer
                .sign(&mut signable)
                .await
                .map_err(signing_failed)?;
            return Ok(SignedParts {
                headers: signable.headers,
                query: signable.query,
            });
        }

        let mut overridden = signable.clone();
        if let Some(host) = &self.signing_host {
            overridden.authority.clone_from(host);
        }
        if let Some(path) = &self.signing_path {
            overridden.path.clone_from(path);
        }
        self.signer
            .sign(&mut overridden)
            .await
            .map_err(signing_failed)?;
        Ok(SignedParts {
            headers: overridden.headers,
            query: overridden.query,
        })
    }

    /// Short name of the signing scheme, for logs.
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        self.signer.scheme()
    }
}

fn signing_failed(err: vaultclient_auth::AuthError) -> DomainError {
    debug!(error = %err, "failed to sign vault request");
    DomainError::new(DomainErrorCode::InternalError)
}
