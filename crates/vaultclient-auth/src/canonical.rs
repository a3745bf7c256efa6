//! SigV4 canonical requests as the client computes them before sending.
//!
//! A signer hashes the string built by [`build_canonical_request`]:
//!
//! ```text
//! METHOD
//! /canonical/uri
//! sorted=query&string=pairs
//! host:vault.local:8500
//! x-amz-date:20240101T000000Z
//!
//! host;x-amz-date
//! <hex sha256 of the body>
//! ```
//!
//! The Vault request builder encodes paths and query values with the same
//! encoders exported here, so the request that leaves the client is exactly
//! the one that was signed.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Assemble the canonical request for an outgoing Vault call.
///
/// `query_string` is the wire query (already encoded), `headers` the headers
/// about to be sent and `signed_headers` the lowercase names to cover.
///
/// # Examples
///
/// ```
/// use vaultclient_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/",
///     "Version=2010-05-08&Action=GetAccounts",
///     &[("Host", "vault.local:8500")],
///     &["host"],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/\nAction=GetAccounts&Version=2010-05-08\nhost:vault.local:8500\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    [
        method.to_owned(),
        build_canonical_uri(uri),
        build_canonical_query_string(query_string),
        format!("{}\n", build_canonical_headers(headers, signed_headers)),
        build_signed_headers_string(signed_headers),
        payload_hash.to_owned(),
    ]
    .join("\n")
}

/// Canonical form of a request path such as `/account/acme/user/bob`.
///
/// Each segment is decoded then re-encoded, so a path the request builder
/// already escaped comes out unchanged. An empty path signs as `/`.
///
/// ```
/// use vaultclient_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/account/alice"), "/account/alice");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }
    let mut canonical = String::with_capacity(path.len());
    for (i, segment) in path.split('/').enumerate() {
        if i > 0 {
            canonical.push('/');
        }
        canonical.push_str(&encode_path_segment(
            &percent_decode_str(segment).decode_utf8_lossy(),
        ));
    }
    canonical
}

/// Sort the `key=value` pairs of an encoded query (`Action`, `Version`, the
/// operation parameters, and for presigning the `X-Amz-*` pairs).
///
/// Pairs order by key, then value. Values are not re-encoded.
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    let mut pairs: Vec<(&str, &str)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    pairs.sort_unstable();

    let mut canonical = String::with_capacity(query.len());
    for (key, value) in pairs {
        if !canonical.is_empty() {
            canonical.push('&');
        }
        canonical.push_str(key);
        canonical.push('=');
        canonical.push_str(value);
    }
    canonical
}

/// `name:value` lines for the headers being signed, sorted by name.
///
/// Names compare case-insensitively, repeated headers join with `,`, and
/// values have their whitespace runs squeezed to one space.
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut values: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        match values.get_mut(&name.to_ascii_lowercase()) {
            Some(existing) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => {
                values.insert(name.to_ascii_lowercase(), value);
            }
        }
    }

    values
        .iter()
        .filter(|(name, _)| signed_headers.contains(&name.as_str()))
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `SignedHeaders` list: names sorted and joined with `;`.
///
/// ```
/// use vaultclient_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(build_signed_headers_string(&["x-amz-date", "host"]), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut names = signed_headers.to_vec();
    names.sort_unstable();
    names.join(";")
}

/// Escape one path segment, `/` included. Used for `{accountName}`-style
/// placeholders in Vault routes.
#[must_use]
pub fn encode_path_segment(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Escape a query key or value. A space becomes `%20`, never `+`.
#[must_use]
pub fn encode_query_component(input: &str) -> String {
    encode_path_segment(input)
}
