//! AWS Signature Version 2 signing.
//!
//! SigV2 is the older HMAC-SHA1 scheme. The `Authorization` header has the
//! format:
//!
//! ```text
//! AWS <AWSAccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedAmzHeaders +
//!                CanonicalizedResource
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use tracing::debug;

use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::signer::{RequestSigner, SignableRequest};

type HmacSha1 = Hmac<Sha1>;

/// Signs requests with a SigV2 `Authorization` header.
#[derive(Debug, Clone)]
pub struct SigV2Signer {
    provider: Arc<dyn CredentialProvider>,
}

impl SigV2Signer {
    /// Create a SigV2 signer.
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider }
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

        request.set_header("date", &now.format("%a, %d %b %Y %H:%M:%S GMT").to_string())?;
        if let Some(token) = &credentials.session_token {
            request.set_header("x-amz-security-token", token)?;
        }

        let string_to_sign = build_string_to_sign(request)?;
        debug!(string_to_sign = ?string_to_sign, "built SigV2 string to sign");

        let signature = compute_sigv2_signature(&credentials.secret_access_key, &string_to_sign);
        request.set_header(
            "authorization",
            &format!("AWS {}:{signature}", credentials.access_key_id),
        )
    }
}

#[async_trait::async_trait]
impl RequestSigner for SigV2Signer {
    fn scheme(&self) -> &'static str {
        "sigv2"
    }

    async fn sign(&self, request: &mut SignableRequest) -> Result<(), AuthError> {
        self.sign_at(request, Utc::now())
    }
}

/// Build the SigV2 string to sign. The resource is the request path.
fn build_string_to_sign(request: &SignableRequest) -> Result<String, AuthError> {
    let method = request.method.as_str();
    let content_md5 = request.header_str("content-md5")?.unwrap_or_default();
    let content_type = request.header_str("content-type")?.unwrap_or_default();

    // When x-amz-date is present the Date field is left empty.
    let date = if request.headers.contains_key("x-amz-date") {
        ""
    } else {
        request.header_str("date")?.unwrap_or_default()
    };

    let amz_headers = build_canonicalized_amz_headers(request)?;
    let resource = &request.path;

    Ok(format!(
        "{method}\n{content_md5}\n{content_type}\n{date}\n{amz_headers}{resource}"
    ))
}

/// All `x-amz-*` headers, lowercased, sorted, one `name:value\n` per line.
fn build_canonicalized_amz_headers(request: &SignableRequest) -> Result<String, AuthError> {
    let mut amz_headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for (name, value) in &request.headers {
        let name_str = name.as_str();
        if name_str.starts_with("x-amz-") {
            let val = value
                .to_str()
                .map_err(|_| AuthError::NonUtf8Header(name_str.to_owned()))?
                .trim()
                .to_owned();
            amz_headers.entry(name_str).or_default().push(val);
        }
    }

    let mut result = String::new();
    for (name, values) in &amz_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }
    Ok(result)
}

/// Compute the SigV2 signature: Base64(HMAC-SHA1(secret, string_to_sign)).
fn compute_sigv2_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
