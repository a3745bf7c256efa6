//! Identifier lookups and result shaping.

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::json;
    use vaultclient_core::VaultClientError;
    use vaultclient_model::input::{
        GetAccountIdsInput, GetAccountsInput, GetCanonicalIdsByAccountIdsInput,
        GetEmailAddressesInput, ListAccessKeysInput, RequestOptions,
    };

    use crate::{MockResponse, MockVault};

    #[tokio::test]
    async fn test_should_unwrap_email_address_message() {
        let server = MockVault::always(MockResponse::json(
            200,
            &json!({"message": {"body": {"canId1": "alice@acme.io"}, "code": 200, "message": "OK"}}),
        ))
        .await;

        let response = server
            .client()
            .get_email_addresses(
                &GetEmailAddressesInput {
                    canonical_ids: vec!["canId1".into()],
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.body["body"]["canId1"], "alice@acme.io");

        let request = server.single_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/acl/emailAddresses");
        assert_eq!(request.sideband(), Some(json!({"canonicalIds": ["canId1"]})));
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_should_index_account_ids_by_canonical_id() {
        let server = MockVault::always(MockResponse::json(
            200,
            &json!([
                {"canId": "c1", "id": "111111111111"},
                {"canId": "c2", "id": "222222222222"},
            ]),
        ))
        .await;

        let response = server
            .client()
            .get_account_ids(
                &GetAccountIdsInput {
                    canonical_ids: vec!["c1".into(), "c2".into()],
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.body,
            json!({"c1": "111111111111", "c2": "222222222222"})
        );

        let request = server.single_request();
        assert_eq!(
            request.query_pairs(),
            vec![
                ("Action".to_owned(), "GetAccountIds".to_owned()),
                ("Version".to_owned(), "2010-05-08".to_owned()),
                ("canonicalIds".to_owned(), "c1".to_owned()),
                ("canonicalIds".to_owned(), "c2".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_should_index_canonical_ids_by_account_id() {
        let server = MockVault::always(MockResponse::json(
            200,
            &json!([{"accountId": "111111111111", "canonicalId": "c1"}]),
        ))
        .await;

        let response = server
            .client()
            .get_canonical_ids_by_account_ids(
                &GetCanonicalIdsByAccountIdsInput {
                    account_ids: vec!["111111111111".into()],
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.body, json!({"111111111111": "c1"}));
    }

    #[tokio::test]
    async fn test_should_decode_xml_success_body() {
        let server = MockVault::always(MockResponse::xml(
            200,
            "<ListAccessKeysResponse><IsTruncated>false</IsTruncated></ListAccessKeysResponse>",
        ))
        .await;

        let response = server
            .client()
            .list_access_keys(
                &ListAccessKeysInput {
                    account_name: "acme".into(),
                    max_items: Some(10),
                    ..Default::default()
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap();
        assert!(response.body.to_string().contains("IsTruncated"));

        let request = server.single_request();
        assert_eq!(request.path, "/accessKeys");
        let sideband = request.sideband().expect("additionaldata");
        assert_eq!(sideband["accountName"], "acme");
        assert_eq!(sideband["maxItems"], 10);
    }

    #[tokio::test]
    async fn test_should_get_accounts_by_name() {
        let server = MockVault::always(MockResponse::json(
            200,
            &json!([{"name": "name1"}, {"name": "name2"}]),
        ))
        .await;

        let response = server
            .client()
            .get_accounts(
                &GetAccountsInput {
                    account_names: Some(vec!["name1".into(), "name2".into()]),
                    ..Default::default()
                },
                &RequestOptions::with_request_uid("test.getAccounts.reqUid"),
            )
            .await
            .unwrap();
        assert_eq!(response.body[1]["name"], "name2");

        let request = server.single_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/");
        assert!(request.header("authorization").is_none());
        assert!(request.header("content-type").is_none());
        assert_eq!(
            request.query_pairs(),
            vec![
                ("Action".to_owned(), "GetAccounts".to_owned()),
                ("Version".to_owned(), "2010-05-08".to_owned()),
                ("accountNames".to_owned(), "name1".to_owned()),
                ("accountNames".to_owned(), "name2".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_should_refuse_account_names_mixed_with_ids() {
        let server = MockVault::always(MockResponse::json(200, &json!([]))).await;

        let err = server
            .client()
            .get_accounts(
                &GetAccountsInput {
                    account_ids: Some(vec!["123456789012".into()]),
                    account_names: Some(vec!["name1".into()]),
                    ..Default::default()
                },
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultClientError::InvalidArgument(_)), "{err:?}");
        assert!(server.requests().is_empty());
    }
}
