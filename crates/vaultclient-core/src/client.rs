//! The Vault client.

use std::sync::Arc;

use http::HeaderValue;
use tracing::{Instrument, debug};
use vaultclient_auth::RequestSigner;
use vaultclient_model::DomainError;
use vaultclient_model::input::{
    AddAccountAttributeInput, AssumeRoleBackbeatInput, CheckPoliciesInput, CreateAccessKeyInput,
    CreateAccountInput, CreateUserInput, DeleteAccessKeyInput, DeleteAccountAttributeInput,
    DeleteAccountInput, DeleteAccountQuotaInput, DeleteUserInput, GenerateAccountAccessKeyInput,
    GenerateAccountPasswordInput, GetAccountIdsInput, GetAccountInput, GetAccountsInput,
    GetCanonicalIdsByAccountIdsInput, GetCanonicalIdsInput, GetEmailAddressesInput,
    GetRolesForWebIdentityInput, GetUserByAccessKeyInput, GetUsersByIdInput, HealthcheckInput,
    ListAccessKeysInput, ListAccountUsersInput, ListAccountsInput, RequestOptions,
    UpdateAccountAttributesInput, UpdateAccountQuotaInput, VerifySignatureV2Input,
    VerifySignatureV4Input,
};

use crate::auth::{Authenticator, SignedParts};
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::{VaultClientError, VaultResult};
use crate::operations::OperationInput;
use crate::request::RequestBuilder;
use crate::response::{VaultResponse, normalize, shape};
use crate::transport::Transport;

/// Header carrying the correlation id.
pub const REQUEST_UID_HEADER: &str = "x-scal-request-uids";

/// Client for one Vault endpoint.
///
/// Cloning is cheap; clones share the configuration, the signer and the
/// connection pool. Any number of calls may run concurrently.
#[derive(Debug, Clone)]
pub struct VaultClient {
    config: Arc<ClientConfig>,
    builder: RequestBuilder,
    authenticator: Authenticator,
    transport: Transport,
}

impl VaultClient {
    /// Create a client signing with the scheme selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultClientError::Config`] for an invalid configuration or
    /// unusable TLS material.
    pub fn new(config: ClientConfig) -> VaultResult<Self> {
        config.validate()?;
        let authenticator = Authenticator::from_config(&config)?;
        Self::assemble(config, authenticator)
    }

    /// Create a client signing with a caller-provided signer.
    pub fn with_signer(config: ClientConfig, signer: Arc<dyn RequestSigner>) -> VaultResult<Self> {
        config.validate()?;
        let authenticator = Authenticator::with_signer(&config, signer)?;
        Self::assemble(config, authenticator)
    }

    fn assemble(config: ClientConfig, authenticator: Authenticator) -> VaultResult<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            builder: RequestBuilder::new(config.path_prefix.as_deref()),
            config: Arc::new(config),
            authenticator,
            transport,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A client sharing this one's pool that also signs account and user
    /// administration routes.
    #[must_use]
    pub fn enable_iam_on_admin_routes(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone().with_admin_routes(true),
            ..self.clone()
        }
    }

    /// Run any operation from its typed input.
    ///
    /// Validation failures return before anything is built or sent.
    pub async fn call<I: OperationInput>(
        &self,
        input: &I,
        options: &RequestOptions,
    ) -> VaultResult<VaultResponse> {
        let context = RequestContext::new(I::OPERATION, options);
        let span = context.span().clone();
        self.execute(input, &context).instrument(span).await
    }

    async fn execute<I: OperationInput>(
        &self,
        input: &I,
        context: &RequestContext,
    ) -> VaultResult<VaultResponse> {
        input.validate()?;
        let request_uid = HeaderValue::from_str(context.request_uid())
            .map_err(|_| VaultClientError::invalid("request uid is not a valid header value"))?;

        let request = self.builder.build(
            context.operation(),
            input.params(),
            context.request_uid().to_owned(),
        )?;
        let SignedParts { mut headers, query } = self.authenticator.authenticate(&request).await?;
        headers.insert(REQUEST_UID_HEADER, request_uid);

        let path_and_query = if query.is_empty() {
            request.path.clone()
        } else {
            format!("{}?{query}", request.path)
        };
        debug!(method = %request.method, path_and_query, "sending vault request");

        let raw = self
            .transport
            .send(request.method.clone(), &path_and_query, headers, request.body.clone())
            .await
            .map_err(|err| {
                debug!(error = %err.chain(), "vault request failed");
                DomainError::from(err)
            })?;

        debug!(status = raw.status.as_u16(), "vault responded");
        let mut response = normalize(raw.status, &raw.status_message, raw.body)?;
        response.body = shape(context.operation().descriptor().shape, response.body);
        Ok(response)
    }

    /// Check that the server is up.
    pub async fn healthcheck(&self, options: &RequestOptions) -> VaultResult<VaultResponse> {
        self.call(&HealthcheckInput, options).await
    }
}

macro_rules! operation_methods {
    ($($(#[$doc:meta])* $name:ident($input:ty);)*) => {
        impl VaultClient {
            $(
                $(#[$doc])*
                pub async fn $name(
                    &self,
                    input: &$input,
                    options: &RequestOptions,
                ) -> VaultResult<VaultResponse> {
                    self.call(input, options).await
                }
            )*
        }
    };
}

operation_methods! {
    /// Create an account.
    create_account(CreateAccountInput);
    /// Set the password of an account.
    generate_account_password(GenerateAccountPasswordInput);
    /// Create an access key for an account, optionally with imported key material.
    generate_account_access_key(GenerateAccountAccessKeyInput);
    /// Delete an account.
    delete_account(DeleteAccountInput);
    /// Set the storage quota of an account.
    update_account_quota(UpdateAccountQuotaInput);
    /// Remove the storage quota of an account.
    delete_account_quota(DeleteAccountQuotaInput);
    /// Replace the custom attributes of an account.
    update_account_attributes(UpdateAccountAttributesInput);
    /// Add one custom attribute to an account.
    add_account_attribute(AddAccountAttributeInput);
    /// Remove one custom attribute from an account.
    delete_account_attribute(DeleteAccountAttributeInput);
    /// List accounts.
    list_accounts(ListAccountsInput);
    /// Get one account by name, id, canonical id or email address.
    get_account(GetAccountInput);
    /// Create a user in an account.
    create_user(CreateUserInput);
    /// Delete a user.
    delete_user(DeleteUserInput);
    /// Create an access key for an account or one of its users.
    create_access_key(CreateAccessKeyInput);
    /// Delete an access key.
    delete_access_key(DeleteAccessKeyInput);
    /// Ask the server to verify a SigV2 signature.
    verify_signature_v2(VerifySignatureV2Input);
    /// Ask the server to verify a SigV4 signature.
    verify_signature_v4(VerifySignatureV4Input);
    /// Email addresses by canonical id. The result is the unwrapped `message`.
    get_email_addresses(GetEmailAddressesInput);
    /// Canonical ids by email address. The result is the unwrapped `message`.
    get_canonical_ids(GetCanonicalIdsInput);
    /// Canonical ids by account id, as an `accountId -> canonicalId` map.
    get_canonical_ids_by_account_ids(GetCanonicalIdsByAccountIdsInput);
    /// Account ids by canonical id, as a `canonicalId -> accountId` map.
    get_account_ids(GetAccountIdsInput);
    /// Accounts by one kind of identifier.
    get_accounts(GetAccountsInput);
    /// Users by id.
    get_users_by_id(GetUsersByIdInput);
    /// User owning an access key.
    get_user_by_access_key(GetUserByAccessKeyInput);
    /// Access keys of an account or user.
    list_access_keys(ListAccessKeysInput);
    /// Users of an account.
    list_account_users(ListAccountUsersInput);
    /// Evaluate policies for a request context.
    check_policies(CheckPoliciesInput);
    /// Assume a role on behalf of the replication service.
    assume_role_backbeat(AssumeRoleBackbeatInput);
    /// Roles reachable from a web identity token.
    get_roles_for_web_identity(GetRolesForWebIdentityInput);
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use tracing_subscriber::fmt::MakeWriter;
    use vaultclient_model::DomainErrorCode;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn client() -> VaultClient {
        VaultClient::new(
            ClientConfig::builder()
                .host("127.0.0.1")
                .port(closed_port())
                .build(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_should_fail_validation_before_network() {
        let err = client()
            .list_access_keys(
                &ListAccessKeysInput {
                    account_name: "test".into(),
                    max_items: Some(0),
                    ..Default::default()
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VaultClientError::invalid("maxItems need to be a value between 1 and 1000 included")
        );
    }

    #[tokio::test]
    async fn test_should_map_connection_refused_to_internal_error() {
        let err = client()
            .healthcheck(&RequestOptions::with_request_uid("uid-1"))
            .await
            .unwrap_err();
        assert!(err.is_code(DomainErrorCode::InternalError), "{err:?}");
    }

    #[tokio::test]
    async fn test_should_log_connection_failure_cause_at_debug() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let err = client()
            .healthcheck(&RequestOptions::with_request_uid("uid-refused"))
            .await
            .unwrap_err();
        assert!(err.is_code(DomainErrorCode::InternalError), "{err:?}");
        assert!(!err.to_string().contains("refused"), "{err}");

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("vault request failed"))
            .unwrap_or_else(|| panic!("no failure event in:\n{output}"));
        assert!(line.contains("DEBUG"), "{line}");
        assert!(line.contains("cannot connect to vault"), "{line}");
        assert!(line.to_ascii_lowercase().contains("connection refused"), "{line}");
        assert!(line.contains("uid-refused"), "{line}");
    }

    #[test]
    fn test_should_reject_invalid_config() {
        let err = VaultClient::new(ClientConfig::builder().host("").build()).unwrap_err();
        assert!(matches!(err, VaultClientError::Config(_)));
    }

    #[test]
    fn test_should_enable_admin_route_signing_on_copy() {
        let client = client();
        let admin = client.enable_iam_on_admin_routes();
        assert!(!client.authenticator.admin_routes());
        assert!(admin.authenticator.admin_routes());
        assert_eq!(admin.config().port, client.config().port);
    }
}
