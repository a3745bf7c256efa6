//! Vault input types, one struct per operation.
//!
//! Fields hold what the caller supplied; nothing is checked here. Optional
//! fields are only sent when present.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-call options shared by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Correlation id sent as `x-scal-request-uids`. Generated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uid: Option<String>,
}

impl RequestOptions {
    /// Options carrying a caller-supplied correlation id.
    #[must_use]
    pub fn with_request_uid(request_uid: impl Into<String>) -> Self {
        Self {
            request_uid: Some(request_uid.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Account administration
// ---------------------------------------------------------------------------

/// Input for the `CreateAccount` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInput {
    /// Account name.
    pub name: String,
    /// Account email address.
    pub email_address: String,
    /// Storage quota in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_max: Option<i64>,
    /// Caller-chosen 12-digit account id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_account_id: Option<String>,
    /// Free-form attributes, sent as a JSON string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<Value>,
}

/// Input for the `GenerateAccountPassword` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAccountPasswordInput {
    /// Account name.
    pub name: String,
    /// New password.
    pub password: String,
}

/// Input for the `GenerateAccountAccessKey` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAccountAccessKeyInput {
    /// Account name.
    pub account_name: String,
    /// Caller-chosen access key id (20 upper-case alphanumerics).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_access_key: Option<String>,
    /// Caller-chosen secret key (40 base64 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_secret_key: Option<String>,
    /// Key lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
}

/// Input for the `DeleteAccount` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountInput {
    /// Account name.
    pub account_name: String,
}

/// Input for the `UpdateAccountQuota` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountQuotaInput {
    /// Account name.
    pub name: String,
    /// New quota in bytes, at least 1.
    pub quota_max: i64,
}

/// Input for the `DeleteAccountQuota` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountQuotaInput {
    /// Account name.
    pub name: String,
}

/// Input for the `UpdateAccountAttributes` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountAttributesInput {
    /// Account name.
    pub name: String,
    /// Replacement attributes, sent as a JSON string.
    pub custom_attributes: Value,
}

/// Identifies one account. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSelector {
    /// Account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    /// Account id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Account ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    /// Canonical id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<String>,
}

impl AccountSelector {
    /// Select by account name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            account_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Select by account id.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            account_id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Input for the `AddAccountAttribute` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAccountAttributeInput {
    /// Target account.
    #[serde(flatten)]
    pub account: AccountSelector,
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// Input for the `DeleteAccountAttribute` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountAttributeInput {
    /// Target account.
    #[serde(flatten)]
    pub account: AccountSelector,
    /// Attribute key.
    pub key: String,
}

/// Input for the `ListAccounts` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsInput {
    /// Numeric pagination marker, at least 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<i64>,
    /// Page size in `1..=1000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
}

/// Input for the `GetAccount` operation. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountInput {
    /// Account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    /// Account id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Canonical id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<String>,
    /// Account email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

// ---------------------------------------------------------------------------
// Users and access keys
// ---------------------------------------------------------------------------

/// Input for the `CreateUser` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    /// Owning account.
    pub account_name: String,
    /// User name.
    pub name: String,
    /// User email address.
    pub email_address: String,
    /// Salted password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Input for the `DeleteUser` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserInput {
    /// Owning account.
    pub account_name: String,
    /// User name.
    pub user_name: String,
}

/// Input for the `CreateAccessKey` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessKeyInput {
    /// Owning account.
    pub account_name: String,
    /// Owning user; the key belongs to the account itself when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Input for the `DeleteAccessKey` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccessKeyInput {
    /// Access key id.
    pub access_key_id: String,
}

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

/// Input for the `VerifySignatureV2` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureV2Input {
    /// String to sign as rebuilt from the request.
    pub string_to_sign: String,
    /// Base64 signature carried by the request.
    pub signature_from_request: String,
    /// Access key id carried by the request.
    pub access_key: String,
    /// `sha1` or `sha256`; `sha256` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<String>,
    /// Request context forwarded for policy evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context: Option<Value>,
    /// Session token carried by the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

/// Input for the `VerifySignatureV4` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureV4Input {
    /// String to sign as rebuilt from the request.
    pub string_to_sign: String,
    /// Hex signature carried by the request.
    pub signature_from_request: String,
    /// Access key id carried by the request.
    pub access_key: String,
    /// Region of the credential scope. Blank values fall back to `us-east-1`.
    pub region: String,
    /// Date of the credential scope (`YYYYMMDD`).
    pub scope_date: String,
    /// Request context forwarded for policy evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context: Option<Value>,
    /// Session token carried by the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Input for the `GetEmailAddresses` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailAddressesInput {
    /// Canonical ids to resolve.
    pub canonical_ids: Vec<String>,
}

/// Input for the `GetCanonicalIds` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCanonicalIdsInput {
    /// Email addresses to resolve.
    pub email_addresses: Vec<String>,
}

/// Input for the `GetCanonicalIdsByAccountIds` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCanonicalIdsByAccountIdsInput {
    /// Account ids to resolve.
    pub account_ids: Vec<String>,
}

/// Input for the `GetAccountIds` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountIdsInput {
    /// Canonical ids to resolve.
    pub canonical_ids: Vec<String>,
}

/// Input for the `GetAccounts` operation. Exactly one list must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountsInput {
    /// Account ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
    /// Email addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<String>>,
    /// Canonical ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_ids: Option<Vec<String>>,
    /// Account names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_names: Option<Vec<String>>,
}

/// Input for the `GetUsersById` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUsersByIdInput {
    /// User ids to resolve.
    pub user_ids: Vec<String>,
}

/// Input for the `GetUserByAccessKey` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserByAccessKeyInput {
    /// Access key id.
    pub access_key: String,
}

/// Input for the `ListAccessKeys` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccessKeysInput {
    /// Owning account.
    pub account_name: String,
    /// Restrict to the keys of this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Page size in `1..=1000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    /// Numeric pagination marker, at least 0. Sent as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<i64>,
}

/// Input for the `ListAccountUsers` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountUsersInput {
    /// Owning account.
    pub account_name: String,
    /// Page size in `1..=1000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    /// Opaque pagination marker returned by a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Only users whose path starts with this prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Policies, health and STS
// ---------------------------------------------------------------------------

/// Input for the `CheckPolicies` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPoliciesInput {
    /// Request context parameters, sent as a JSON string.
    pub request_context_params: Value,
    /// ARN of the user to evaluate.
    pub user_arn: String,
}

/// Input for the `Healthcheck` operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthcheckInput;

/// Input for the `AssumeRoleBackbeat` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumeRoleBackbeatInput {
    /// ARN of the role to assume.
    pub role_arn: String,
    /// Name of the role session.
    pub role_session_name: String,
    /// Session lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
}

/// Input for the `GetRolesForWebIdentity` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRolesForWebIdentityInput {
    /// OIDC token issued by the identity provider.
    pub web_identity_token: String,
}
