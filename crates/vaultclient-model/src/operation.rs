//! Vault operations and their wire descriptors.

use std::fmt;

/// HTTP methods used by the Vault API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// The equivalent [`http::Method`].
    #[must_use]
    pub fn as_http(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Delete => http::Method::DELETE,
        }
    }
}

/// When a request must be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRequirement {
    /// Never signed (signature checks, lookups, policy evaluation).
    None,
    /// Signed only when the client is configured to authenticate admin routes.
    AdminRoute,
    /// Always signed.
    Always,
}

/// How parameters travel to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadEncoding {
    /// Flat `key=value` pairs in the query string.
    Query,
    /// One JSON object in the `additionaldata` query parameter.
    Sideband,
    /// `application/x-www-form-urlencoded` body.
    Form,
    /// `application/json` body.
    Json,
    /// No parameters besides the path.
    Empty,
}

/// Post-processing applied to a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// Body returned as decoded.
    Raw,
    /// The value of the top-level `message` key.
    UnwrapMessage,
    /// An array of objects turned into a map of `key` field to `value` field.
    IndexBy {
        /// Field used as map key.
        key: &'static str,
        /// Field used as map value.
        value: &'static str,
    },
}

/// Static wire description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template; `{name}` segments are filled from path parameters.
    pub path: &'static str,
    /// When to sign.
    pub auth: AuthRequirement,
    /// Where parameters go.
    pub encoding: PayloadEncoding,
    /// IAM-style `Action` name for action routes.
    pub action: Option<&'static str>,
    /// Keys allowed in the query string or body.
    pub params: &'static [&'static str],
    /// Keys allowed in the `additionaldata` JSON object.
    pub sideband: &'static [&'static str],
    /// Result post-processing.
    pub shape: ResultShape,
}

impl OperationDescriptor {
    /// Placeholder names of the path template, in order.
    pub fn path_placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
        })
    }

    /// Whether `key` may be sent in the query string or body.
    #[must_use]
    pub fn declares_param(&self, key: &str) -> bool {
        self.params.contains(&key)
    }

    /// Whether `key` may be sent in the `additionaldata` object.
    #[must_use]
    pub fn declares_sideband(&self, key: &str) -> bool {
        self.sideband.contains(&key)
    }
}

/// All remote Vault operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Account administration
    /// Create an account.
    CreateAccount,
    /// Set the password of an account.
    GenerateAccountPassword,
    /// Create an access key for an account.
    GenerateAccountAccessKey,
    /// Delete an account.
    DeleteAccount,
    /// Set the storage quota of an account.
    UpdateAccountQuota,
    /// Remove the storage quota of an account.
    DeleteAccountQuota,
    /// Replace the custom attributes of an account.
    UpdateAccountAttributes,
    /// Add one custom attribute to an account.
    AddAccountAttribute,
    /// Remove one custom attribute from an account.
    DeleteAccountAttribute,
    /// List accounts.
    ListAccounts,
    /// Get one account.
    GetAccount,

    // Users and access keys
    /// Create a user in an account.
    CreateUser,
    /// Delete a user.
    DeleteUser,
    /// Create an access key for an account or user.
    CreateAccessKey,
    /// Delete an access key.
    DeleteAccessKey,

    // Signature verification
    /// Verify a SigV2 signature.
    VerifySignatureV2,
    /// Verify a SigV4 signature.
    VerifySignatureV4,

    // Lookups
    /// Email addresses by canonical ids.
    GetEmailAddresses,
    /// Canonical ids by email addresses.
    GetCanonicalIds,
    /// Canonical ids by account ids.
    GetCanonicalIdsByAccountIds,
    /// Account ids by canonical ids.
    GetAccountIds,
    /// Accounts by one kind of identifier.
    GetAccounts,
    /// Users by id.
    GetUsersById,
    /// User owning an access key.
    GetUserByAccessKey,
    /// Access keys of an account or user.
    ListAccessKeys,
    /// Users of an account.
    ListAccountUsers,

    // Policies, health and STS
    /// Evaluate policies for a request context.
    CheckPolicies,
    /// Server health.
    Healthcheck,
    /// Assume a role as the replication service.
    AssumeRoleBackbeat,
    /// Roles reachable from a web identity token.
    GetRolesForWebIdentity,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Self; 30] = [
        Self::CreateAccount,
        Self::GenerateAccountPassword,
        Self::GenerateAccountAccessKey,
        Self::DeleteAccount,
        Self::UpdateAccountQuota,
        Self::DeleteAccountQuota,
        Self::UpdateAccountAttributes,
        Self::AddAccountAttribute,
        Self::DeleteAccountAttribute,
        Self::ListAccounts,
        Self::GetAccount,
        Self::CreateUser,
        Self::DeleteUser,
        Self::CreateAccessKey,
        Self::DeleteAccessKey,
        Self::VerifySignatureV2,
        Self::VerifySignatureV4,
        Self::GetEmailAddresses,
        Self::GetCanonicalIds,
        Self::GetCanonicalIdsByAccountIds,
        Self::GetAccountIds,
        Self::GetAccounts,
        Self::GetUsersById,
        Self::GetUserByAccessKey,
        Self::ListAccessKeys,
        Self::ListAccountUsers,
        Self::CheckPolicies,
        Self::Healthcheck,
        Self::AssumeRoleBackbeat,
        Self::GetRolesForWebIdentity,
    ];

    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAccount => "CreateAccount",
            Self::GenerateAccountPassword => "GenerateAccountPassword",
            Self::GenerateAccountAccessKey => "GenerateAccountAccessKey",
            Self::DeleteAccount => "DeleteAccount",
            Self::UpdateAccountQuota => "UpdateAccountQuota",
            Self::DeleteAccountQuota => "DeleteAccountQuota",
            Self::UpdateAccountAttributes => "UpdateAccountAttributes",
            Self::AddAccountAttribute => "AddAccountAttribute",
            Self::DeleteAccountAttribute => "DeleteAccountAttribute",
            Self::ListAccounts => "ListAccounts",
            Self::GetAccount => "GetAccount",
            Self::CreateUser => "CreateUser",
            Self::DeleteUser => "DeleteUser",
            Self::CreateAccessKey => "CreateAccessKey",
            Self::DeleteAccessKey => "DeleteAccessKey",
            Self::VerifySignatureV2 => "VerifySignatureV2",
            Self::VerifySignatureV4 => "VerifySignatureV4",
            Self::GetEmailAddresses => "GetEmailAddresses",
            Self::GetCanonicalIds => "GetCanonicalIds",
            Self::GetCanonicalIdsByAccountIds => "GetCanonicalIdsByAccountIds",
            Self::GetAccountIds => "GetAccountIds",
            Self::GetAccounts => "GetAccounts",
            Self::GetUsersById => "GetUsersById",
            Self::GetUserByAccessKey => "GetUserByAccessKey",
            Self::ListAccessKeys => "ListAccessKeys",
            Self::ListAccountUsers => "ListAccountUsers",
            Self::CheckPolicies => "CheckPolicies",
            Self::Healthcheck => "Healthcheck",
            Self::AssumeRoleBackbeat => "AssumeRoleBackbeat",
            Self::GetRolesForWebIdentity => "GetRolesForWebIdentity",
        }
    }

    /// Parse an operation name string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// The wire descriptor of this operation.
    #[must_use]
    pub fn descriptor(&self) -> OperationDescriptor {
        match self {
            Self::CreateAccount => admin_action(
                "CreateAccount",
                &[
                    "name",
                    "emailAddress",
                    "quotaMax",
                    "externalAccountId",
                    "customAttributes",
                ],
            ),
            Self::GenerateAccountPassword => {
                admin_action("GenerateAccountPassword", &["name", "password"])
            }
            Self::GenerateAccountAccessKey => admin_action(
                "GenerateAccountAccessKey",
                &[
                    "AccountName",
                    "externalAccessKey",
                    "externalSecretKey",
                    "durationSeconds",
                ],
            ),
            Self::DeleteAccount => admin_action("DeleteAccount", &["AccountName"]),
            Self::UpdateAccountQuota => {
                admin_action("UpdateAccountQuota", &["name", "quotaMax"])
            }
            Self::DeleteAccountQuota => admin_action("DeleteAccountQuota", &["name"]),
            Self::UpdateAccountAttributes => {
                admin_action("UpdateAccountAttributes", &["name", "customAttributes"])
            }
            Self::AddAccountAttribute => admin_action(
                "AddAccountAttribute",
                &["accountName", "accountId", "arn", "canonicalId", "key", "value"],
            ),
            Self::DeleteAccountAttribute => admin_action(
                "DeleteAccountAttribute",
                &["accountName", "accountId", "arn", "canonicalId", "key"],
            ),
            Self::ListAccounts => admin_action("ListAccounts", &["Marker", "MaxItems"]),
            Self::GetAccount => admin_action(
                "GetAccount",
                &["accountName", "accountId", "canonicalId", "emailAddress"],
            ),
            Self::CreateUser => OperationDescriptor {
                method: HttpMethod::Post,
                path: "/user",
                auth: AuthRequirement::AdminRoute,
                encoding: PayloadEncoding::Json,
                action: None,
                params: &["accountName", "name", "emailAddress", "saltedPasswd"],
                sideband: &[],
                shape: ResultShape::Raw,
            },
            Self::DeleteUser => OperationDescriptor {
                method: HttpMethod::Delete,
                path: "/account/{accountName}/user/{userName}",
                auth: AuthRequirement::AdminRoute,
                encoding: PayloadEncoding::Empty,
                action: None,
                params: &[],
                sideband: &[],
                shape: ResultShape::Raw,
            },
            Self::CreateAccessKey => OperationDescriptor {
                method: HttpMethod::Post,
                path: "/accessKey",
                auth: AuthRequirement::AdminRoute,
                encoding: PayloadEncoding::Json,
                action: None,
                params: &["accountName", "userName"],
                sideband: &[],
                shape: ResultShape::Raw,
            },
            Self::DeleteAccessKey => OperationDescriptor {
                method: HttpMethod::Delete,
                path: "/accessKey/{accessKeyId}",
                auth: AuthRequirement::AdminRoute,
                encoding: PayloadEncoding::Empty,
                action: None,
                params: &[],
                sideband: &[],
                shape: ResultShape::Raw,
            },
            Self::VerifySignatureV2 => sideband(
                "/auth/v2",
                &[
                    "stringToSign",
                    "signatureFromRequest",
                    "hashAlgorithm",
                    "accessKey",
                    "requestContext",
                    "securityToken",
                ],
                ResultShape::Raw,
            ),
            Self::VerifySignatureV4 => sideband(
                "/auth/v4",
                &[
                    "stringToSign",
                    "signatureFromRequest",
                    "accessKey",
                    "region",
                    "scopeDate",
                    "requestContext",
                    "securityToken",
                ],
                ResultShape::Raw,
            ),
            Self::GetEmailAddresses => sideband(
                "/acl/emailAddresses",
                &["canonicalIds"],
                ResultShape::UnwrapMessage,
            ),
            Self::GetCanonicalIds => sideband(
                "/acl/canonicalIds",
                &["emailAddresses"],
                ResultShape::UnwrapMessage,
            ),
            Self::GetCanonicalIdsByAccountIds => query_action(
                "GetCanonicalIdsByAccountIds",
                &["accountIds"],
                ResultShape::IndexBy {
                    key: "accountId",
                    value: "canonicalId",
                },
            ),
            Self::GetAccountIds => query_action(
                "GetAccountIds",
                &["canonicalIds"],
                ResultShape::IndexBy {
                    key: "canId",
                    value: "id",
                },
            ),
            Self::GetAccounts => query_action(
                "GetAccounts",
                &["accountIds", "emailAddresses", "canonicalIds", "accountNames"],
                ResultShape::Raw,
            ),
            Self::GetUsersById => query_action("GetUsersById", &["userIds"], ResultShape::Raw),
            Self::GetUserByAccessKey => {
                query_action("GetUserByAccessKey", &["accessKey"], ResultShape::Raw)
            }
            Self::ListAccessKeys => sideband(
                "/accessKeys",
                &["accountName", "maxItems", "marker", "name"],
                ResultShape::Raw,
            ),
            Self::ListAccountUsers => sideband(
                "/users",
                &["name", "maxItems", "marker", "pathPrefix"],
                ResultShape::Raw,
            ),
            Self::CheckPolicies => query_action(
                "CheckPolicies",
                &["requestContextParams", "userArn"],
                ResultShape::Raw,
            ),
            Self::Healthcheck => OperationDescriptor {
                method: HttpMethod::Get,
                path: "/_/healthcheck",
                auth: AuthRequirement::None,
                encoding: PayloadEncoding::Empty,
                action: None,
                params: &[],
                sideband: &[],
                shape: ResultShape::Raw,
            },
            Self::AssumeRoleBackbeat => OperationDescriptor {
                auth: AuthRequirement::Always,
                ..admin_action(
                    "AssumeRoleBackbeat",
                    &["RoleArn", "RoleSessionName", "DurationSeconds"],
                )
            },
            Self::GetRolesForWebIdentity => OperationDescriptor {
                auth: AuthRequirement::None,
                ..admin_action("GetRolesForWebIdentity", &["WebIdentityToken"])
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `POST /` with a form body carrying `Action`.
fn admin_action(action: &'static str, params: &'static [&'static str]) -> OperationDescriptor {
    OperationDescriptor {
        method: HttpMethod::Post,
        path: "/",
        auth: AuthRequirement::AdminRoute,
        encoding: PayloadEncoding::Form,
        action: Some(action),
        params,
        sideband: &[],
        shape: ResultShape::Raw,
    }
}

/// `GET /` with `Action` and flat query parameters.
fn query_action(
    action: &'static str,
    params: &'static [&'static str],
    shape: ResultShape,
) -> OperationDescriptor {
    OperationDescriptor {
        method: HttpMethod::Get,
        path: "/",
        auth: AuthRequirement::None,
        encoding: PayloadEncoding::Query,
        action: Some(action),
        params,
        sideband: &[],
        shape,
    }
}

/// `GET <path>` with every parameter inside `additionaldata`.
fn sideband(
    path: &'static str,
    keys: &'static [&'static str],
    shape: ResultShape,
) -> OperationDescriptor {
    OperationDescriptor {
        method: HttpMethod::Get,
        path,
        auth: AuthRequirement::None,
        encoding: PayloadEncoding::Sideband,
        action: None,
        params: &[],
        sideband: keys,
        shape,
    }
}
