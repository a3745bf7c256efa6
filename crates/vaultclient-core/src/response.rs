//! Response normalization.
//!
//! Vault answers with JSON, with legacy XML error documents, or with an empty
//! body. [`normalize`] maps any of these plus the status code to either a
//! [`VaultResponse`] or exactly one error. It is a pure function of its
//! inputs.
//!
//! Error bodies are resolved in a fixed order:
//!
//! 1. `ErrorResponse.Error.{Code,Message}` or `Error.{Code,Message}` with a
//!    known code (keys compared case-insensitively)
//! 2. legacy forms: a `"<Code>": true` flag at the top level or under
//!    `message`/`error`, or a `{code: <status>, message}` pair from the
//!    legacy table
//! 3. an `InternalError` marker or a numeric `code` of 500 or more
//! 4. anything else is logged and reported as an `InternalError`

use bytes::Bytes;
use http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::warn;
use vaultclient_model::{DomainError, DomainErrorCode, ResultShape};

use crate::error::{VaultClientError, VaultResult};

/// Description of errors whose shape is not recognized.
pub const UNTRANSLATED_ERROR: &str = "could not translate server error";

/// How a response body was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// No body, or only whitespace.
    Empty,
    /// JSON object or array.
    Json,
    /// XML document.
    Xml,
}

impl BodyKind {
    /// Decide the parser from the first non-whitespace byte.
    #[must_use]
    pub fn sniff(raw: &[u8]) -> Self {
        match raw.iter().find(|b| !b.is_ascii_whitespace()) {
            None => Self::Empty,
            Some(b'{' | b'[') => Self::Json,
            Some(_) => Self::Xml,
        }
    }
}

/// A decoded response before it is turned into a result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// HTTP status.
    pub status: StatusCode,
    /// Reason phrase.
    pub status_message: String,
    /// Body as received.
    pub raw: Bytes,
    /// Detected encoding.
    pub kind: BodyKind,
    /// Parsed body; `Null` for empty bodies.
    pub value: Value,
}

impl ResponseEnvelope {
    /// Parse `raw` according to its sniffed kind.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when the body is not valid JSON or XML.
    pub fn decode(
        status: StatusCode,
        status_message: impl Into<String>,
        raw: Bytes,
    ) -> Result<Self, String> {
        let kind = BodyKind::sniff(&raw);
        let value = match kind {
            BodyKind::Empty => Value::Null,
            BodyKind::Json => serde_json::from_slice(&raw).map_err(|e| e.to_string())?,
            BodyKind::Xml => vaultclient_xml::xml_to_value(&raw).map_err(|e| e.to_string())?,
        };
        Ok(Self {
            status,
            status_message: status_message.into(),
            raw,
            kind,
            value,
        })
    }
}

/// A successful Vault response.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Reason phrase.
    pub status_message: String,
    /// Decoded (and, after shaping, post-processed) body.
    pub body: Value,
}

/// Turn status, reason and raw body into a response or an error.
///
/// # Errors
///
/// Returns [`VaultClientError::Domain`] for every status of 400 or more, and
/// [`VaultClientError::Decode`] when a successful body cannot be parsed.
pub fn normalize(status: StatusCode, status_message: &str, raw: Bytes) -> VaultResult<VaultResponse> {
    let envelope = match ResponseEnvelope::decode(status, status_message, raw.clone()) {
        Ok(envelope) => envelope,
        Err(message) if is_error_status(status) => {
            warn!(status = status.as_u16(), error = %message, "undecodable vault error body");
            return Err(fallback_error(status).into());
        }
        Err(message) => {
            return Err(VaultClientError::Decode {
                status,
                message,
                raw: String::from_utf8_lossy(&raw).into_owned(),
            });
        }
    };

    if is_error_status(status) {
        return Err(resolve_error(status, &envelope.value).into());
    }

    let body = match envelope.kind {
        BodyKind::Empty if status == StatusCode::NO_CONTENT => {
            json!({"message": {"code": 204, "message": "No content."}})
        }
        BodyKind::Empty => Value::Object(Map::new()),
        BodyKind::Json | BodyKind::Xml => envelope.value,
    };
    Ok(VaultResponse {
        status,
        status_message: envelope.status_message,
        body,
    })
}

fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

/// Map an error body to exactly one [`DomainError`] carrying `status`.
#[must_use]
pub fn resolve_error(status: StatusCode, body: &Value) -> DomainError {
    envelope_error(body)
        .or_else(|| legacy_error(body))
        .or_else(|| internal_marker(body))
        .unwrap_or_else(|| {
            warn!(status = status.as_u16(), body = %body, "could not translate server error");
            DomainError::internal(UNTRANSLATED_ERROR)
        })
        .with_status(status)
}

fn fallback_error(status: StatusCode) -> DomainError {
    DomainError::internal(UNTRANSLATED_ERROR).with_status(status)
}

/// Post-process a successful body according to the operation's result shape.
#[must_use]
pub fn shape(shape: ResultShape, body: Value) -> Value {
    match shape {
        ResultShape::Raw => body,
        ResultShape::UnwrapMessage => match body {
            Value::Object(mut map) => match map.remove("message") {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => other,
        },
        ResultShape::IndexBy { key, value } => match body {
            Value::Array(items) => {
                let index: Map<String, Value> = items
                    .iter()
                    .filter_map(|item| {
                        let k = item.get(key)?.as_str()?;
                        Some((k.to_owned(), item.get(value)?.clone()))
                    })
                    .collect();
                Value::Object(index)
            }
            other => other,
        },
    }
}

fn get_ci<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn first(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.first().unwrap_or(value),
        other => other,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn is_true(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// A numeric `code`, also accepted as a decimal string (XML has no numbers).
fn numeric_code(value: &Value) -> Option<u16> {
    match value.get("code")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn described(code: DomainErrorCode, holder: &Value) -> DomainError {
    match non_empty_str(holder.get("description")).or_else(|| non_empty_str(holder.get("message")))
    {
        Some(message) => DomainError::with_message(code, message),
        None => DomainError::new(code),
    }
}

fn envelope_error(body: &Value) -> Option<DomainError> {
    let error = get_ci(body, "ErrorResponse")
        .and_then(|response| get_ci(response, "Error"))
        .or_else(|| get_ci(body, "Error"))?;
    let error = first(error);
    let code = DomainErrorCode::from_code(get_ci(error, "Code")?.as_str()?.trim())?;
    Some(match non_empty_str(get_ci(error, "Message")) {
        Some(message) => DomainError::with_message(code, message),
        None => DomainError::new(code),
    })
}

fn holders(body: &Value) -> impl Iterator<Item = &Value> {
    [Some(body), body.get("message"), body.get("error")]
        .into_iter()
        .flatten()
}

fn legacy_error(body: &Value) -> Option<DomainError> {
    for holder in holders(body) {
        let flagged = DomainErrorCode::ALL
            .into_iter()
            .filter(|code| *code != DomainErrorCode::InternalError)
            .find(|code| is_true(holder.get(code.as_str())));
        if let Some(code) = flagged {
            return Some(described(code, holder));
        }
    }

    for holder in holders(body) {
        let Some(status) = numeric_code(holder) else {
            continue;
        };
        let message = non_empty_str(holder.get("message"))
            .or_else(|| non_empty_str(holder.get("description")))
            .unwrap_or_default();
        if let Some(code) = DomainErrorCode::from_legacy(status, message) {
            return Some(DomainError::with_message(code, message));
        }
    }
    None
}

fn internal_marker(body: &Value) -> Option<DomainError> {
    holders(body)
        .find(|holder| {
            is_true(holder.get("InternalError"))
                || holder.as_str() == Some("InternalError")
                || holder.get("code").and_then(Value::as_str) == Some("InternalError")
                || numeric_code(holder).is_some_and(|code| code >= 500)
        })
        .map(|holder| described(DomainErrorCode::InternalError, holder))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err_of(status: u16, body: &str) -> DomainError {
        let status = StatusCode::from_u16(status).unwrap();
        match normalize(status, "", Bytes::from(body.to_owned())) {
            Err(VaultClientError::Domain(err)) => err,
            other => panic!("expected a domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_should_map_empty_204_to_no_content() {
        let response = normalize(StatusCode::NO_CONTENT, "No Content", Bytes::new()).unwrap();
        assert_eq!(
            response.body,
            json!({"message": {"code": 204, "message": "No content."}})
        );
        let response = normalize(StatusCode::OK, "OK", Bytes::from_static(b"  \n")).unwrap();
        assert_eq!(response.body, json!({}));
    }

    #[test]
    fn test_should_decode_json_and_xml_success_bodies() {
        let response = normalize(
            StatusCode::CREATED,
            "Created",
            Bytes::from_static(br#"{"account":{"arn":"arn:aws:iam::1:/acme/"}}"#),
        )
        .unwrap();
        assert_eq!(response.body["account"]["arn"], "arn:aws:iam::1:/acme/");

        let response = normalize(
            StatusCode::OK,
            "OK",
            Bytes::from_static(b"<Result><Id>1</Id></Result>"),
        )
        .unwrap();
        assert_eq!(response.body, json!({"Result": {"Id": "1"}}));
    }

    #[test]
    fn test_should_report_undecodable_success_body() {
        let err = normalize(StatusCode::OK, "OK", Bytes::from_static(b"{not json")).unwrap_err();
        match err {
            VaultClientError::Decode { status, raw, .. } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(raw, "{not json");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_should_resolve_xml_error_envelope() {
        let err = err_of(
            409,
            "<ErrorResponse><Error><Code>EntityAlreadyExists</Code>\
             <Message>account exists</Message></Error></ErrorResponse>",
        );
        assert_eq!(err.code, DomainErrorCode::EntityAlreadyExists);
        assert_eq!(err.message, "account exists");
        assert_eq!(err.status_code, StatusCode::CONFLICT);
    }

    #[test]
    fn test_should_resolve_json_error_envelope_case_insensitively() {
        let err = err_of(404, r#"{"error":{"code":"NoSuchEntity","message":"no bob"}}"#);
        assert_eq!(err.code, DomainErrorCode::NoSuchEntity);
        assert_eq!(err.message, "no bob");
    }

    #[test]
    fn test_should_resolve_legacy_flag() {
        let err = err_of(
            400,
            r#"{"code":400,"description":"bad value","InvalidParameterValue":true}"#,
        );
        assert_eq!(err.code, DomainErrorCode::InvalidParameterValue);
        assert_eq!(err.message, "bad value");
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_resolve_legacy_code_message_pair() {
        let err = err_of(
            409,
            r#"{"message":{"code":409,"message":"The request was rejected because it attempted to createa resource that already exists."}}"#,
        );
        assert_eq!(err.code, DomainErrorCode::EntityAlreadyExists);
        assert_eq!(err.status_code, StatusCode::CONFLICT);
    }

    #[test]
    fn test_should_resolve_internal_markers() {
        let err = err_of(500, r#"{"message":"InternalError"}"#);
        assert_eq!(err.code, DomainErrorCode::InternalError);
        let err = err_of(503, r#"{"code":503,"message":"backend down"}"#);
        assert_eq!(err.code, DomainErrorCode::InternalError);
        assert_eq!(err.message, "backend down");
        assert_eq!(err.status_code, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_should_fall_back_for_unknown_shapes() {
        for (status, body) in [
            (400, "<Response><Code>foo</Code></Response>"),
            (418, r#"{"Error":{"Code":"Teapot"}}"#),
            (404, ""),
            (502, "Bad Gateway"),
        ] {
            let err = err_of(status, body);
            assert_eq!(err.code, DomainErrorCode::InternalError, "{body}");
            assert_eq!(err.message, UNTRANSLATED_ERROR);
            assert_eq!(err.status_code.as_u16(), status);
        }
    }

    #[test]
    fn test_should_normalize_idempotently() {
        let raw = Bytes::from_static(br#"{"message":{"code":409,"message":"x"}}"#);
        let first = normalize(StatusCode::CONFLICT, "Conflict", raw.clone());
        let second = normalize(StatusCode::CONFLICT, "Conflict", raw);
        assert_eq!(first, second);
    }

    #[test]
    fn test_should_shape_results() {
        let body = json!({"message": ["a@b.c"]});
        assert_eq!(shape(ResultShape::UnwrapMessage, body), json!(["a@b.c"]));

        let body = json!([{"id": "acc1", "canId": "c1"}, {"id": "acc2", "canId": "c2"}]);
        assert_eq!(
            shape(ResultShape::IndexBy { key: "canId", value: "id" }, body),
            json!({"c1": "acc1", "c2": "acc2"})
        );

        let body = json!({"unexpected": true});
        assert_eq!(
            shape(ResultShape::IndexBy { key: "canId", value: "id" }, body.clone()),
            body
        );
    }
}
