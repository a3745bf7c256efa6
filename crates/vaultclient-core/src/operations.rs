//! Validation and parameter mapping for every operation input.

use vaultclient_model::Operation;
use vaultclient_model::input::{
    AccountSelector, AddAccountAttributeInput, AssumeRoleBackbeatInput, CheckPoliciesInput,
    CreateAccessKeyInput, CreateAccountInput, CreateUserInput, DeleteAccessKeyInput,
    DeleteAccountAttributeInput, DeleteAccountInput, DeleteAccountQuotaInput, DeleteUserInput,
    GenerateAccountAccessKeyInput, GenerateAccountPasswordInput, GetAccountIdsInput,
    GetAccountInput, GetAccountsInput, GetCanonicalIdsByAccountIdsInput, GetCanonicalIdsInput,
    GetEmailAddressesInput, GetRolesForWebIdentityInput, GetUserByAccessKeyInput,
    GetUsersByIdInput, HealthcheckInput, ListAccessKeysInput, ListAccountUsersInput,
    ListAccountsInput, UpdateAccountAttributesInput, UpdateAccountQuotaInput,
    VerifySignatureV2Input, VerifySignatureV4Input,
};

use crate::error::{VaultClientError, VaultResult};
use crate::request::RequestParams;
use crate::validation::{
    duration, exactly_one, external_access_key, external_account_id, external_secret_key,
    hash_algorithm, max_items, non_empty, non_empty_list, normalize_region, numeric_marker,
    opaque_marker, optional_non_empty, path_prefix, quota,
};

/// Hash algorithm assumed for SigV2 verification when none is given.
pub const DEFAULT_HASH_ALGORITHM: &str = "sha256";

/// A typed input that knows its operation, its checks and its wire keys.
pub trait OperationInput {
    /// The operation this input belongs to.
    const OPERATION: Operation;

    /// Reject values the server would refuse. Runs before anything is built.
    fn validate(&self) -> VaultResult<()>;

    /// Wire parameters, keyed exactly as the server expects them.
    fn params(&self) -> RequestParams;
}

fn selector_fields(selector: &AccountSelector) -> [(&'static str, Option<&str>); 4] {
    [
        ("accountName", selector.account_name.as_deref()),
        ("accountId", selector.account_id.as_deref()),
        ("arn", selector.arn.as_deref()),
        ("canonicalId", selector.canonical_id.as_deref()),
    ]
}

fn validate_selector(selector: &AccountSelector) -> VaultResult<()> {
    let fields = selector_fields(selector);
    for (name, value) in fields {
        optional_non_empty(name, value)?;
    }
    let presence: Vec<(&str, bool)> = fields
        .iter()
        .map(|(name, value)| (*name, value.is_some()))
        .collect();
    exactly_one(&presence)
}

fn with_selector(params: RequestParams, selector: &AccountSelector) -> RequestParams {
    selector_fields(selector)
        .into_iter()
        .fold(params, |params, (name, value)| params.optional(name, value))
}

impl OperationInput for CreateAccountInput {
    const OPERATION: Operation = Operation::CreateAccount;

    fn validate(&self) -> VaultResult<()> {
        non_empty("name", &self.name)?;
        non_empty("emailAddress", &self.email_address)?;
        if let Some(q) = self.quota_max {
            quota(q)?;
        }
        external_account_id(self.external_account_id.as_deref())?;
        if self
            .custom_attributes
            .as_ref()
            .is_some_and(|attrs| !attrs.is_object())
        {
            return Err(VaultClientError::invalid(
                "customAttributes must be a JSON object",
            ));
        }
        Ok(())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("name", &self.name)
            .field("emailAddress", &self.email_address)
            .optional("quotaMax", self.quota_max)
            .optional("externalAccountId", self.external_account_id.as_deref())
            .optional(
                "customAttributes",
                self.custom_attributes.as_ref().map(ToString::to_string),
            )
    }
}

impl OperationInput for GenerateAccountPasswordInput {
    const OPERATION: Operation = Operation::GenerateAccountPassword;

    fn validate(&self) -> VaultResult<()> {
        non_empty("name", &self.name)?;
        non_empty("password", &self.password)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("name", &self.name)
            .field("password", &self.password)
    }
}

impl OperationInput for GenerateAccountAccessKeyInput {
    const OPERATION: Operation = Operation::GenerateAccountAccessKey;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        if self.external_access_key.is_some() != self.external_secret_key.is_some() {
            return Err(VaultClientError::invalid(
                "externalAccessKey and externalSecretKey must be given together",
            ));
        }
        external_access_key(self.external_access_key.as_deref())?;
        external_secret_key(self.external_secret_key.as_deref())?;
        duration("durationSeconds", self.duration_seconds)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("AccountName", &self.account_name)
            .optional("externalAccessKey", self.external_access_key.as_deref())
            .optional("externalSecretKey", self.external_secret_key.as_deref())
            .optional("durationSeconds", self.duration_seconds)
    }
}

impl OperationInput for DeleteAccountInput {
    const OPERATION: Operation = Operation::DeleteAccount;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("AccountName", &self.account_name)
    }
}

impl OperationInput for UpdateAccountQuotaInput {
    const OPERATION: Operation = Operation::UpdateAccountQuota;

    fn validate(&self) -> VaultResult<()> {
        non_empty("name", &self.name)?;
        quota(self.quota_max)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("name", &self.name)
            .field("quotaMax", self.quota_max)
    }
}

impl OperationInput for DeleteAccountQuotaInput {
    const OPERATION: Operation = Operation::DeleteAccountQuota;

    fn validate(&self) -> VaultResult<()> {
        non_empty("name", &self.name)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("name", &self.name)
    }
}

impl OperationInput for UpdateAccountAttributesInput {
    const OPERATION: Operation = Operation::UpdateAccountAttributes;

    fn validate(&self) -> VaultResult<()> {
        non_empty("name", &self.name)?;
        if !self.custom_attributes.is_object() {
            return Err(VaultClientError::invalid(
                "customAttributes must be a JSON object",
            ));
        }
        Ok(())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("name", &self.name)
            .field("customAttributes", self.custom_attributes.to_string())
    }
}

impl OperationInput for AddAccountAttributeInput {
    const OPERATION: Operation = Operation::AddAccountAttribute;

    fn validate(&self) -> VaultResult<()> {
        validate_selector(&self.account)?;
        non_empty("key", &self.key)?;
        non_empty("value", &self.value)
    }

    fn params(&self) -> RequestParams {
        with_selector(RequestParams::new(), &self.account)
            .field("key", &self.key)
            .field("value", &self.value)
    }
}

impl OperationInput for DeleteAccountAttributeInput {
    const OPERATION: Operation = Operation::DeleteAccountAttribute;

    fn validate(&self) -> VaultResult<()> {
        validate_selector(&self.account)?;
        non_empty("key", &self.key)
    }

    fn params(&self) -> RequestParams {
        with_selector(RequestParams::new(), &self.account).field("key", &self.key)
    }
}

impl OperationInput for ListAccountsInput {
    const OPERATION: Operation = Operation::ListAccounts;

    fn validate(&self) -> VaultResult<()> {
        numeric_marker(self.marker)?;
        max_items(self.max_items)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .optional("Marker", self.marker)
            .optional("MaxItems", self.max_items)
    }
}

impl OperationInput for GetAccountInput {
    const OPERATION: Operation = Operation::GetAccount;

    fn validate(&self) -> VaultResult<()> {
        let fields = [
            ("accountName", self.account_name.as_deref()),
            ("accountId", self.account_id.as_deref()),
            ("canonicalId", self.canonical_id.as_deref()),
            ("emailAddress", self.email_address.as_deref()),
        ];
        for (name, value) in fields {
            optional_non_empty(name, value)?;
        }
        let presence: Vec<(&str, bool)> = fields
            .iter()
            .map(|(name, value)| (*name, value.is_some()))
            .collect();
        exactly_one(&presence)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .optional("accountName", self.account_name.as_deref())
            .optional("accountId", self.account_id.as_deref())
            .optional("canonicalId", self.canonical_id.as_deref())
            .optional("emailAddress", self.email_address.as_deref())
    }
}

impl OperationInput for CreateUserInput {
    const OPERATION: Operation = Operation::CreateUser;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        non_empty("name", &self.name)?;
        non_empty("emailAddress", &self.email_address)?;
        optional_non_empty("password", self.password.as_deref())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("accountName", &self.account_name)
            .field("name", &self.name)
            .field("emailAddress", &self.email_address)
            .optional("saltedPasswd", self.password.as_deref())
    }
}

impl OperationInput for DeleteUserInput {
    const OPERATION: Operation = Operation::DeleteUser;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        non_empty("userName", &self.user_name)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .path("accountName", &self.account_name)
            .path("userName", &self.user_name)
    }
}

impl OperationInput for CreateAccessKeyInput {
    const OPERATION: Operation = Operation::CreateAccessKey;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        optional_non_empty("userName", self.user_name.as_deref())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("accountName", &self.account_name)
            .optional("userName", self.user_name.as_deref())
    }
}

impl OperationInput for DeleteAccessKeyInput {
    const OPERATION: Operation = Operation::DeleteAccessKey;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accessKeyId", &self.access_key_id)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().path("accessKeyId", &self.access_key_id)
    }
}

impl OperationInput for VerifySignatureV2Input {
    const OPERATION: Operation = Operation::VerifySignatureV2;

    fn validate(&self) -> VaultResult<()> {
        non_empty("stringToSign", &self.string_to_sign)?;
        non_empty("signatureFromRequest", &self.signature_from_request)?;
        non_empty("accessKey", &self.access_key)?;
        hash_algorithm(self.hash_algorithm.as_deref())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("stringToSign", &self.string_to_sign)
            .field("signatureFromRequest", &self.signature_from_request)
            .field(
                "hashAlgorithm",
                self.hash_algorithm.as_deref().unwrap_or(DEFAULT_HASH_ALGORITHM),
            )
            .field("accessKey", &self.access_key)
            .optional("requestContext", self.request_context.clone())
            .optional("securityToken", self.security_token.as_deref())
    }
}

impl OperationInput for VerifySignatureV4Input {
    const OPERATION: Operation = Operation::VerifySignatureV4;

    fn validate(&self) -> VaultResult<()> {
        non_empty("stringToSign", &self.string_to_sign)?;
        non_empty("signatureFromRequest", &self.signature_from_request)?;
        non_empty("accessKey", &self.access_key)?;
        non_empty("scopeDate", &self.scope_date)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("stringToSign", &self.string_to_sign)
            .field("signatureFromRequest", &self.signature_from_request)
            .field("accessKey", &self.access_key)
            .field("region", normalize_region(&self.region))
            .field("scopeDate", &self.scope_date)
            .optional("requestContext", self.request_context.clone())
            .optional("securityToken", self.security_token.as_deref())
    }
}

impl OperationInput for GetEmailAddressesInput {
    const OPERATION: Operation = Operation::GetEmailAddresses;

    fn validate(&self) -> VaultResult<()> {
        non_empty_list("canonicalIds", &self.canonical_ids)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("canonicalIds", self.canonical_ids.as_slice())
    }
}

impl OperationInput for GetCanonicalIdsInput {
    const OPERATION: Operation = Operation::GetCanonicalIds;

    fn validate(&self) -> VaultResult<()> {
        non_empty_list("emailAddresses", &self.email_addresses)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("emailAddresses", self.email_addresses.as_slice())
    }
}

impl OperationInput for GetCanonicalIdsByAccountIdsInput {
    const OPERATION: Operation = Operation::GetCanonicalIdsByAccountIds;

    fn validate(&self) -> VaultResult<()> {
        non_empty_list("accountIds", &self.account_ids)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("accountIds", self.account_ids.as_slice())
    }
}

impl OperationInput for GetAccountIdsInput {
    const OPERATION: Operation = Operation::GetAccountIds;

    fn validate(&self) -> VaultResult<()> {
        non_empty_list("canonicalIds", &self.canonical_ids)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("canonicalIds", self.canonical_ids.as_slice())
    }
}

impl OperationInput for GetAccountsInput {
    const OPERATION: Operation = Operation::GetAccounts;

    fn validate(&self) -> VaultResult<()> {
        let fields = [
            ("accountIds", self.account_ids.as_deref()),
            ("emailAddresses", self.email_addresses.as_deref()),
            ("canonicalIds", self.canonical_ids.as_deref()),
            ("accountNames", self.account_names.as_deref()),
        ];
        let presence: Vec<(&str, bool)> = fields
            .iter()
            .map(|(name, values)| (*name, values.is_some()))
            .collect();
        exactly_one(&presence)?;
        for (name, values) in fields {
            if let Some(values) = values {
                non_empty_list(name, values)?;
            }
        }
        Ok(())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .optional("accountIds", self.account_ids.clone())
            .optional("emailAddresses", self.email_addresses.clone())
            .optional("canonicalIds", self.canonical_ids.clone())
            .optional("accountNames", self.account_names.clone())
    }
}

impl OperationInput for GetUsersByIdInput {
    const OPERATION: Operation = Operation::GetUsersById;

    fn validate(&self) -> VaultResult<()> {
        non_empty_list("userIds", &self.user_ids)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("userIds", self.user_ids.as_slice())
    }
}

impl OperationInput for GetUserByAccessKeyInput {
    const OPERATION: Operation = Operation::GetUserByAccessKey;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accessKey", &self.access_key)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("accessKey", &self.access_key)
    }
}

impl OperationInput for ListAccessKeysInput {
    const OPERATION: Operation = Operation::ListAccessKeys;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        optional_non_empty("userName", self.user_name.as_deref())?;
        numeric_marker(self.marker)?;
        max_items(self.max_items)
    }

    fn params(&self) -> RequestParams {
        // The server expects the numeric marker as a string.
        RequestParams::new()
            .field("accountName", &self.account_name)
            .optional("maxItems", self.max_items)
            .optional("marker", self.marker.map(|m| m.to_string()))
            .optional("name", self.user_name.as_deref())
    }
}

impl OperationInput for ListAccountUsersInput {
    const OPERATION: Operation = Operation::ListAccountUsers;

    fn validate(&self) -> VaultResult<()> {
        non_empty("accountName", &self.account_name)?;
        opaque_marker(self.marker.as_deref())?;
        max_items(self.max_items)?;
        path_prefix(self.path_prefix.as_deref())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("name", &self.account_name)
            .optional("maxItems", self.max_items)
            .optional("marker", self.marker.as_deref())
            .optional("pathPrefix", self.path_prefix.as_deref())
    }
}

impl OperationInput for CheckPoliciesInput {
    const OPERATION: Operation = Operation::CheckPolicies;

    fn validate(&self) -> VaultResult<()> {
        non_empty("userArn", &self.user_arn)?;
        if self.request_context_params.is_null() {
            return Err(VaultClientError::invalid("requestContextParams is required"));
        }
        Ok(())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field(
                "requestContextParams",
                self.request_context_params.to_string(),
            )
            .field("userArn", &self.user_arn)
    }
}

impl OperationInput for HealthcheckInput {
    const OPERATION: Operation = Operation::Healthcheck;

    fn validate(&self) -> VaultResult<()> {
        Ok(())
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
    }
}

impl OperationInput for AssumeRoleBackbeatInput {
    const OPERATION: Operation = Operation::AssumeRoleBackbeat;

    fn validate(&self) -> VaultResult<()> {
        non_empty("roleArn", &self.role_arn)?;
        non_empty("roleSessionName", &self.role_session_name)?;
        duration("durationSeconds", self.duration_seconds)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .field("RoleArn", &self.role_arn)
            .field("RoleSessionName", &self.role_session_name)
            .optional("DurationSeconds", self.duration_seconds)
    }
}

impl OperationInput for GetRolesForWebIdentityInput {
    const OPERATION: Operation = Operation::GetRolesForWebIdentity;

    fn validate(&self) -> VaultResult<()> {
        non_empty("webIdentityToken", &self.web_identity_token)
    }

    fn params(&self) -> RequestParams {
        RequestParams::new().field("WebIdentityToken", &self.web_identity_token)
    }
}
