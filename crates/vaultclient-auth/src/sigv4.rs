//! AWS Signature Version 4 header signing.
//!
//! The signing flow is:
//!
//! 1. Stamp the request with `x-amz-date` (and `x-amz-security-token` when the
//!    credentials carry a session token).
//! 2. Build the canonical request over `host`, `x-amz-date` and whichever of
//!    `content-type`, `x-amz-content-sha256` and the security token are set,
//!    with the SHA-256 of the body as payload hash.
//! 3. Build the string to sign from the timestamp, credential scope and the
//!    canonical request hash.
//! 4. Derive the signing key with the HMAC-SHA256 chain and sign.
//! 5. Write the `Authorization` header.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{build_canonical_request, build_signed_headers_string};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SignableRequest};

/// The only algorithm this crate produces.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers that are signed whenever they are present on the request.
const OPTIONAL_SIGNED_HEADERS: &[&str] =
    &["content-type", "x-amz-content-sha256", "x-amz-security-token"];

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with SigV4 `Authorization` headers.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    provider: Arc<dyn CredentialProvider>,
    region: String,
    service: String,
}

impl SigV4Signer {
    /// Create a signer for `service` in `region`.
    pub fn new(
        provider: impl CredentialProvider + 'static,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self::from_shared(Arc::new(provider), region, service)
    }

    /// Create a signer from an already shared provider.
    pub fn from_shared(
        provider: Arc<dyn CredentialProvider>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Sign `request` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when credentials are unavailable or a header
    /// cannot be written.
    pub fn sign_at(
        &self,
        request: &mut SignableRequest,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let credentials = self.provider.credentials()?;
        let timestamp = format_timestamp(now);
        let date = format_date(now);

        request.set_header("x-amz-date", &timestamp)?;
        if let Some(token) = &credentials.session_token {
            request.set_header("x-amz-security-token", token)?;
        }

        let mut header_pairs: Vec<(&str, &str)> = vec![
            ("host", request.authority.as_str()),
            ("x-amz-date", timestamp.as_str()),
        ];
        for name in OPTIONAL_SIGNED_HEADERS {
            if let Some(value) = request.header_str(name)? {
                header_pairs.push((*name, value));
            }
        }
        let signed_headers: Vec<&str> = header_pairs.iter().map(|(name, _)| *name).collect();

        let payload_hash = hash_payload(&request.body);
        let canonical_request = build_canonical_request(
            request.method.as_str(),
            &request.path,
            &request.query,
            &header_pairs,
            &signed_headers,
            &payload_hash,
        );
        debug!(canonical_request, "built SigV4 canonical request");

        let scope = credential_scope(&date, &self.region, &self.service);
        let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = build_string_to_sign(&timestamp, &scope, &canonical_hash);

        let signing_key =
            derive_signing_key(&credentials.secret_access_key, &date, &self.region, &self.service);
        let signature = compute_signature(&signing_key, &string_to_sign);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            credentials.access_key_id,
            build_signed_headers_string(&signed_headers),
        );
        request.set_header("authorization", &authorization)?;

        debug!(access_key_id = %credentials.access_key_id, scope, "signed request with SigV4");
        Ok(())
    }
}

#[async_trait::async_trait]
impl RequestSigner for SigV4Signer {
    fn scheme(&self) -> &'static str {
        "sigv4"
    }

    async fn sign(&self, request: &mut SignableRequest) -> Result<(), AuthError> {
        self.sign_at(request, Utc::now())
    }
}

/// `YYYYMMDD'T'HHMMSS'Z'`, as used by `x-amz-date`.
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDD`, as used in the credential scope.
#[must_use]
pub fn format_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// `date/region/service/aws4_request`.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/aws4_request")
}

/// Build the SigV4 string to sign.
///
/// ```
/// use vaultclient_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20150830T123600Z",
///     "20150830/us-east-1/iam/aws4_request",
///     "f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20150830T123600Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using the HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of a request body.
///
/// ```
/// use vaultclient_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
