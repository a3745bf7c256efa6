//! HTTP transport over one pooled `reqwest` client.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Method, StatusCode};
use reqwest::{Certificate, Identity};

use crate::config::{ClientConfig, TlsConfig};
use crate::error::{TransportError, VaultClientError, VaultResult};

/// Status, reason and full body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Reason phrase of the status.
    pub status_message: String,
    /// Complete response body.
    pub body: Bytes,
}

/// Sends finished requests to one Vault endpoint.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl Transport {
    /// Build the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultClientError::Config`] when the TLS material cannot be
    /// parsed or the client cannot be built.
    pub fn new(config: &ClientConfig) -> VaultResult<Self> {
        let mut builder = reqwest::Client::builder().pool_idle_timeout(config.pool_idle_timeout());
        if config.use_https {
            builder = apply_tls(builder, &config.tls)?;
        }
        let client = builder
            .build()
            .map_err(|e| VaultClientError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            request_timeout: config.request_timeout(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and read the whole response.
    ///
    /// `path_and_query` is appended verbatim to the base URL. Non-2xx
    /// statuses are returned as responses, not errors.
    pub async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}{path_and_query}", self.base_url);
        let mut request = self.client.request(method, url).headers(headers);
        if !body.is_empty() {
            request = request.body(body);
        }
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let mut response = request.send().await.map_err(TransportError::from_send)?;
        let status = response.status();

        let mut buf = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(TransportError::from_body)? {
            buf.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status,
            status_message: status.canonical_reason().unwrap_or_default().to_owned(),
            body: buf.freeze(),
        })
    }
}

fn apply_tls(
    mut builder: reqwest::ClientBuilder,
    tls: &TlsConfig,
) -> VaultResult<reqwest::ClientBuilder> {
    if let Some(ca) = &tls.ca_pem {
        let roots = Certificate::from_pem_bundle(ca.as_bytes())
            .map_err(|e| VaultClientError::Config(format!("invalid CA certificate: {e}")))?;
        if roots.is_empty() {
            return Err(VaultClientError::Config(
                "CA bundle holds no certificate".to_owned(),
            ));
        }
        builder = builder.tls_certs_only(roots);
    }
    if let (Some(key), Some(cert)) = (&tls.key_pem, &tls.cert_pem) {
        let pem = format!("{cert}\n{key}");
        let identity = Identity::from_pem(pem.as_bytes())
            .map_err(|e| VaultClientError::Config(format!("invalid client key pair: {e}")))?;
        builder = builder.identity(identity);
    }
    if tls.ignore_ca {
        builder = builder.tls_danger_accept_invalid_certs(true);
    }
    Ok(builder)
}
