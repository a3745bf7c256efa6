//! Presigned (query string) AWS Signature Version 4.
//!
//! Instead of an `Authorization` header the signature travels in query
//! parameters:
//!
//! - `X-Amz-Algorithm` - always `AWS4-HMAC-SHA256`
//! - `X-Amz-Credential` - `AKID/date/region/service/aws4_request`
//! - `X-Amz-Date` - ISO 8601 basic format timestamp
//! - `X-Amz-Expires` - validity in seconds
//! - `X-Amz-SignedHeaders` - always `host`
//! - `X-Amz-Security-Token` - only with temporary credentials
//! - `X-Amz-Signature` - appended last, over everything above
//!
//! The payload hash is always `UNSIGNED-PAYLOAD`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{build_canonical_request, encode_query_component};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SignableRequest};
use crate::sigv4::{
    ALGORITHM, build_string_to_sign, compute_signature, credential_scope, derive_signing_key,
    format_date, format_timestamp,
};

/// The payload hash value used for all presigned requests.
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Longest validity AWS accepts for a presigned request (7 days).
const MAX_EXPIRES_SECS: u64 = 604_800;

/// Default validity of a presigned request.
pub const DEFAULT_EXPIRES_SECS: u64 = 900;

/// Signs requests by appending `X-Amz-*` query parameters.
#[derive(Debug, Clone)]
pub struct PresignedV4Signer {
    provider: Arc<dyn CredentialProvider>,
    region: String,
    service: String,
    expires_secs: u64,
}

impl PresignedV4Signer {
    /// Create a presigner valid for [`DEFAULT_EXPIRES_SECS`].
    pub fn new(
        provider: Arc<dyn CredentialProvider>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            region: region.into(),
            service: service.into(),
            expires_secs: DEFAULT_EXPIRES_SECS,
        }
    }

    /// Override the validity window.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidExpiry`] outside `1..=604800`.
    pub fn with_expires(mut self, expires_secs: u64) -> Result<Self, AuthError> {
        if !(1..=MAX_EXPIRES_SECS).contains(&expires_secs) {
            return Err(AuthError::InvalidExpiry(expires_secs));
        }
        self.expires_secs = expires_secs;
        Ok(self)
    }

    /// Presign `request` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when credentials are unavailable.
    pub fn sign_at(
        &self,
        request: &mut SignableRequest,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let credentials = self.provider.credentials()?;
        let timestamp = format_timestamp(now);
        let date = format_date(now);
        let scope = credential_scope(&date, &self.region, &self.service);

        request.push_query_pair("X-Amz-Algorithm", ALGORITHM);
        request.push_query_pair(
            "X-Amz-Credential",
            &encode_query_component(&format!("{}/{scope}", credentials.access_key_id)),
        );
        request.push_query_pair("X-Amz-Date", &timestamp);
        request.push_query_pair("X-Amz-Expires", &self.expires_secs.to_string());
        request.push_query_pair("X-Amz-SignedHeaders", "host");
        if let Some(token) = &credentials.session_token {
            request.push_query_pair("X-Amz-Security-Token", &encode_query_component(token));
        }

        let canonical_request = build_canonical_request(
            request.method.as_str(),
            &request.path,
            &request.query,
            &[("host", request.authority.as_str())],
            &["host"],
            UNSIGNED_PAYLOAD,
        );
        debug!(canonical_request, "built presigned canonical request");

        let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = build_string_to_sign(&timestamp, &scope, &canonical_hash);
        let signing_key =
            derive_signing_key(&credentials.secret_access_key, &date, &self.region, &self.service);
        let signature = compute_signature(&signing_key, &string_to_sign);

        request.push_query_pair("X-Amz-Signature", &signature);
        Ok(())
    }
}

#[async_trait::async_trait]
impl RequestSigner for PresignedV4Signer {
    fn scheme(&self) -> &'static str {
        "sigv4-presigned"
    }

    async fn sign(&self, request: &mut SignableRequest) -> Result<(), AuthError> {
        self.sign_at(request, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::credentials::{Credentials, StaticCredentialProvider};

    fn presigner(credentials: Credentials) -> PresignedV4Signer {
        PresignedV4Signer::new(
            Arc::new(StaticCredentialProvider::new(credentials)),
            "us-east-1",
            "iam",
        )
    }

    #[test]
    fn test_should_append_presign_parameters_in_order() {
        let signer = presigner(Credentials::new("AKIDEXAMPLE", "secret"));
        let mut request = SignableRequest::new(http::Method::GET, "vault:8500", "/");
        request.query = "Action=GetAccounts&Version=2010-05-08".to_owned();

        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        signer.sign_at(&mut request, now).unwrap();

        assert!(request.query.starts_with(
            "Action=GetAccounts&Version=2010-05-08&X-Amz-Algorithm=AWS4-HMAC-SHA256\
             &X-Amz-Credential=AKIDEXAMPLE%2F20240102%2Fus-east-1%2Fiam%2Faws4_request\
             &X-Amz-Date=20240102T030405Z&X-Amz-Expires=900&X-Amz-SignedHeaders=host\
             &X-Amz-Signature="
        ));
        let signature = request.query.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_should_carry_session_token_in_query() {
        let signer = presigner(Credentials::new("AKIDEXAMPLE", "secret").with_session_token("a/b"));
        let mut request = SignableRequest::new(http::Method::GET, "vault:8500", "/");

        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        signer.sign_at(&mut request, now).unwrap();

        assert!(request.query.contains("X-Amz-Security-Token=a%2Fb"));
    }

    #[test]
    fn test_should_reject_out_of_range_expiry() {
        let signer = presigner(Credentials::new("AKIDEXAMPLE", "secret"));
        assert!(matches!(
            signer.clone().with_expires(0),
            Err(AuthError::InvalidExpiry(0))
        ));
        assert!(signer.clone().with_expires(MAX_EXPIRES_SECS + 1).is_err());
        assert!(signer.with_expires(3600).is_ok());
    }
}
