//! Input checks run before a request is built.
//!
//! A failed check returns [`VaultClientError::InvalidArgument`] and nothing is
//! sent. Messages match the wording Vault operators already know from the
//! server side.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{VaultClientError, VaultResult};

/// Region used when none (or an unusable one) is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Largest accepted `maxItems`.
pub const MAX_ITEMS_LIMIT: i64 = 1000;

static EXTERNAL_ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").expect("valid regex"));

static EXTERNAL_ACCESS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{20}$").expect("valid regex"));

static EXTERNAL_SECRET_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]{40}$").expect("valid regex"));

/// `value` must not be empty.
pub fn non_empty(field: &str, value: &str) -> VaultResult<()> {
    if value.is_empty() {
        return Err(VaultClientError::invalid(format!("{field} is required")));
    }
    Ok(())
}

/// `values` must hold at least one entry and no empty entry.
pub fn non_empty_list(field: &str, values: &[String]) -> VaultResult<()> {
    if values.is_empty() {
        return Err(VaultClientError::invalid(format!(
            "{field} must contain at least one value"
        )));
    }
    if values.iter().any(String::is_empty) {
        return Err(VaultClientError::invalid(format!(
            "{field} cannot contain empty values"
        )));
    }
    Ok(())
}

/// When given, `value` must not be empty.
pub fn optional_non_empty(field: &str, value: Option<&str>) -> VaultResult<()> {
    value.map_or(Ok(()), |v| non_empty(field, v))
}

/// `maxItems` must be in `1..=1000`.
pub fn max_items(value: Option<i64>) -> VaultResult<()> {
    match value {
        Some(n) if !(1..=MAX_ITEMS_LIMIT).contains(&n) => Err(VaultClientError::invalid(
            "maxItems need to be a value between 1 and 1000 included",
        )),
        _ => Ok(()),
    }
}

/// Numeric pagination markers start at zero.
pub fn numeric_marker(value: Option<i64>) -> VaultResult<()> {
    match value {
        Some(n) if n < 0 => Err(VaultClientError::invalid("marker must be >= 0")),
        _ => Ok(()),
    }
}

/// Opaque pagination markers cannot be empty.
pub fn opaque_marker(value: Option<&str>) -> VaultResult<()> {
    match value {
        Some("") => Err(VaultClientError::invalid("Marker cannot be empty")),
        _ => Ok(()),
    }
}

/// User path prefixes are absolute.
pub fn path_prefix(value: Option<&str>) -> VaultResult<()> {
    match value {
        Some(prefix) if !prefix.starts_with('/') => Err(VaultClientError::invalid(
            "pathPrefix cannot be empty and need start with '/'",
        )),
        _ => Ok(()),
    }
}

/// SigV2 hash algorithms accepted by the server.
pub fn hash_algorithm(value: Option<&str>) -> VaultResult<()> {
    match value {
        None | Some("sha1" | "sha256") => Ok(()),
        Some(_) => Err(VaultClientError::invalid(
            "hashAlgorithm must be sha1 or sha256",
        )),
    }
}

/// Exactly one of the named fields must be set.
pub fn exactly_one(fields: &[(&str, bool)]) -> VaultResult<()> {
    if fields.iter().filter(|(_, present)| *present).count() == 1 {
        return Ok(());
    }
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    Err(VaultClientError::invalid(format!(
        "exactly one of {} must be given",
        names.join(", ")
    )))
}

/// External account ids are 12 digits.
pub fn external_account_id(value: Option<&str>) -> VaultResult<()> {
    matches_pattern(
        value,
        &EXTERNAL_ACCOUNT_ID,
        "externalAccountId must be a 12 digit number",
    )
}

/// External access keys are 20 upper-case alphanumerics.
pub fn external_access_key(value: Option<&str>) -> VaultResult<()> {
    matches_pattern(
        value,
        &EXTERNAL_ACCESS_KEY,
        "externalAccessKey must be 20 upper-case letters or digits",
    )
}

/// External secret keys are 40 base64 characters.
pub fn external_secret_key(value: Option<&str>) -> VaultResult<()> {
    matches_pattern(
        value,
        &EXTERNAL_SECRET_KEY,
        "externalSecretKey must be 40 base64 characters",
    )
}

fn matches_pattern(value: Option<&str>, pattern: &Regex, message: &str) -> VaultResult<()> {
    match value {
        Some(v) if !pattern.is_match(v) => Err(VaultClientError::invalid(message)),
        _ => Ok(()),
    }
}

/// Quotas are positive byte counts.
pub fn quota(value: i64) -> VaultResult<()> {
    if value < 1 {
        return Err(VaultClientError::invalid(
            "quotaMax must be a number greater than 0",
        ));
    }
    Ok(())
}

/// Durations are positive second counts.
pub fn duration(field: &str, value: Option<i64>) -> VaultResult<()> {
    match value {
        Some(n) if n <= 0 => Err(VaultClientError::invalid(format!(
            "{field} must be a number greater than 0"
        ))),
        _ => Ok(()),
    }
}

/// Region to sign with: blank or malformed regions fall back to `us-east-1`.
#[must_use]
pub fn normalize_region(region: &str) -> String {
    let region = region.trim();
    if region.is_empty()
        || !region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return DEFAULT_REGION.to_owned();
    }
    region.to_owned()
}
