//! Failure paths: transport, unrecognized error bodies, and validation.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vaultclient_core::{ClientConfig, VaultClient, VaultClientError};
    use vaultclient_model::DomainErrorCode;
    use vaultclient_model::input::{
        DeleteAccessKeyInput, GetAccountInput, ListAccessKeysInput, ListAccountsInput,
        RequestOptions,
    };

    use crate::{MockResponse, MockVault, closed_port};

    const FALLBACK: &str = "could not translate server error";

    #[tokio::test]
    async fn test_should_map_connection_refused_to_internal_error() {
        let config = ClientConfig::builder()
            .host("127.0.0.1")
            .port(closed_port())
            .build();
        let err = VaultClient::new(config)
            .unwrap()
            .healthcheck(&RequestOptions::default())
            .await
            .unwrap_err();
        let domain = err.domain().expect("domain error");
        assert_eq!(domain.code, DomainErrorCode::InternalError);
        assert_eq!(domain.status_code.as_u16(), 500);
    }

    #[tokio::test]
    async fn test_should_fall_back_on_unknown_xml_error_code() {
        let server = MockVault::always(MockResponse::xml(
            400,
            "<ErrorResponse><Error><Code>SomethingNew</Code><Message>?</Message></Error></ErrorResponse>",
        ))
        .await;

        let err = server
            .client()
            .delete_access_key(
                &DeleteAccessKeyInput {
                    access_key_id: "AKIAEXAMPLE".into(),
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        let domain = err.domain().expect("domain error");
        assert_eq!(domain.code, DomainErrorCode::InternalError);
        assert_eq!(domain.message, FALLBACK);
        assert_eq!(domain.status_code.as_u16(), 400);
    }

    #[tokio::test]
    async fn test_should_translate_known_xml_error_code() {
        let server = MockVault::always(MockResponse::xml(
            404,
            "<ErrorResponse><Error><Code>NoSuchEntity</Code><Message>no such key</Message></Error></ErrorResponse>",
        ))
        .await;

        let err = server
            .client()
            .delete_access_key(
                &DeleteAccessKeyInput {
                    access_key_id: "AKIAEXAMPLE".into(),
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_code(DomainErrorCode::NoSuchEntity), "{err:?}");
        assert_eq!(err.domain().map(|d| d.message.as_str()), Some("no such key"));
    }

    #[tokio::test]
    async fn test_should_fall_back_on_garbage_error_body() {
        let server = MockVault::always(MockResponse::raw(502, "<<<not a body")).await;

        let err = server
            .client()
            .healthcheck(&RequestOptions::default())
            .await
            .unwrap_err();
        let domain = err.domain().expect("domain error");
        assert_eq!(domain.code, DomainErrorCode::InternalError);
        assert_eq!(domain.status_code.as_u16(), 502);
    }

    #[tokio::test]
    async fn test_should_report_undecodable_success_body() {
        let server = MockVault::always(MockResponse::raw(200, "{ truncated")).await;

        let err = server
            .client()
            .healthcheck(&RequestOptions::default())
            .await
            .unwrap_err();
        match err {
            VaultClientError::Decode { status, raw, .. } => {
                assert_eq!(status.as_u16(), 200);
                assert_eq!(raw, "{ truncated");
            }
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_reject_out_of_range_pagination_without_sending() {
        let server = MockVault::always(MockResponse::json(200, &json!({}))).await;
        let client = server.client();

        for max_items in [0, 1001] {
            let err = client
                .list_accounts(
                    &ListAccountsInput {
                        marker: None,
                        max_items: Some(max_items),
                    },
                    &RequestOptions::default(),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, VaultClientError::InvalidArgument(_)), "{err:?}");
        }

        let err = client
            .list_access_keys(
                &ListAccessKeysInput {
                    account_name: "acme".into(),
                    marker: Some(-1),
                    ..Default::default()
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, VaultClientError::invalid("marker must be >= 0"));

        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_ambiguous_account_selector_without_sending() {
        let server = MockVault::always(MockResponse::json(200, &json!({}))).await;

        let err = server
            .client()
            .get_account(
                &GetAccountInput {
                    account_name: Some("acme".into()),
                    account_id: Some("123456789012".into()),
                    ..Default::default()
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultClientError::InvalidArgument(_)), "{err:?}");
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_should_run_concurrent_calls_on_one_client() {
        let server = MockVault::always(MockResponse::json(200, &json!({"ok": true}))).await;
        let client = server.client();

        let calls = (0..8).map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .healthcheck(&RequestOptions::with_request_uid(format!("uid-{i}")))
                    .await
            })
        });
        for call in calls.collect::<Vec<_>>() {
            let response = call.await.unwrap().unwrap();
            assert_eq!(response.body, json!({"ok": true}));
        }

        let mut uids: Vec<String> = server
            .requests()
            .iter()
            .filter_map(|r| r.header("x-scal-request-uids").map(str::to_owned))
            .collect();
        uids.sort();
        assert_eq!(uids.len(), 8);
        uids.dedup();
        assert_eq!(uids.len(), 8);
    }
}
