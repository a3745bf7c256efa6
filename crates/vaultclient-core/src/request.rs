//! Request building.
//!
//! [`RequestBuilder`] turns an [`Operation`] plus its [`RequestParams`] into
//! the exact bytes that go on the wire: method, encoded path, query string,
//! body and content type. Keys the operation does not declare are rejected
//! here, so a malformed request is never emitted.

use bytes::Bytes;
use serde_json::{Map, Value};
use vaultclient_auth::canonical::{encode_path_segment, encode_query_component};
use vaultclient_model::{Operation, OperationDescriptor, PayloadEncoding};

use crate::error::{VaultClientError, VaultResult};

/// IAM API version sent with every `Action` request.
pub const API_VERSION: &str = "2010-05-08";

/// Query key carrying the JSON sideband object.
pub const SIDEBAND_KEY: &str = "additionaldata";

/// Form body content type.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// JSON body content type.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A string.
    Str(String),
    /// An integer, rendered in decimal.
    Int(i64),
    /// A list, sent as repeated keys in flat encodings.
    List(Vec<String>),
    /// Arbitrary JSON, kept structured inside JSON encodings.
    Json(Value),
}

impl ParamValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(n) => Value::from(*n),
            Self::List(items) => Value::from(items.clone()),
            Self::Json(v) => v.clone(),
        }
    }

    fn flat_values(&self) -> Vec<String> {
        match self {
            Self::Str(s) => vec![s.clone()],
            Self::Int(n) => vec![n.to_string()],
            Self::List(items) => items.clone(),
            Self::Json(v) => vec![v.to_string()],
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[String]> for ParamValue {
    fn from(value: &[String]) -> Self {
        Self::List(value.to_vec())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Parameters of one call, split into path placeholders and payload fields.
///
/// Field order is kept: it is the order keys appear on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    path: Vec<(&'static str, String)>,
    fields: Vec<(&'static str, ParamValue)>,
}

impl RequestParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the `{name}` placeholder of the path template.
    #[must_use]
    pub fn path(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path.push((name, value.into()));
        self
    }

    /// Add a payload field.
    #[must_use]
    pub fn field(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.fields.push((key, value.into()));
        self
    }

    /// Add a payload field when `value` is present.
    #[must_use]
    pub fn optional<V: Into<ParamValue>>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    /// Payload field keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }
}

/// A request ready for signing and sending.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    /// The operation this request performs.
    pub operation: Operation,
    /// HTTP method.
    pub method: http::Method,
    /// Encoded path including the configured prefix.
    pub path: String,
    /// Encoded query string without the leading `?`.
    pub query: String,
    /// Request body.
    pub body: Bytes,
    /// `Content-Type` of the body, if there is one.
    pub content_type: Option<&'static str>,
    /// Correlation id sent as `x-scal-request-uids`.
    pub request_uid: String,
}

impl BuiltRequest {
    /// Path and query as written in the request line.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Builds [`BuiltRequest`]s from the static operation table.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    path_prefix: String,
}

impl RequestBuilder {
    /// Create a builder prepending `path_prefix` (if any) to every path.
    #[must_use]
    pub fn new(path_prefix: Option<&str>) -> Self {
        Self {
            path_prefix: path_prefix
                .map(|p| p.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
        }
    }

    /// Build the wire form of `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultClientError::InvalidArgument`] when a placeholder is
    /// missing or a key is not declared by the operation.
    pub fn build(
        &self,
        operation: Operation,
        params: RequestParams,
        request_uid: String,
    ) -> VaultResult<BuiltRequest> {
        let descriptor = operation.descriptor();
        let path = self.build_path(operation, &descriptor, &params.path)?;
        check_declared(operation, &descriptor, &params.fields)?;

        let mut query = String::new();
        let mut body = Bytes::new();
        let mut content_type = None;

        match descriptor.encoding {
            PayloadEncoding::Query => {
                let mut pairs = action_pairs(&descriptor);
                pairs.extend(flat_pairs(&params.fields));
                query = encode_query(&pairs);
            }
            PayloadEncoding::Sideband => {
                let blob = json_object(&params.fields).to_string();
                query = encode_query(&[(SIDEBAND_KEY.to_owned(), blob)]);
            }
            PayloadEncoding::Form => {
                let mut pairs = action_pairs(&descriptor);
                pairs.extend(flat_pairs(&params.fields));
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                for (key, value) in &pairs {
                    serializer.append_pair(key, value);
                }
                body = Bytes::from(serializer.finish());
                content_type = Some(FORM_CONTENT_TYPE);
            }
            PayloadEncoding::Json => {
                body = Bytes::from(json_object(&params.fields).to_string());
                content_type = Some(JSON_CONTENT_TYPE);
            }
            PayloadEncoding::Empty => {}
        }

        Ok(BuiltRequest {
            operation,
            method: descriptor.method.as_http(),
            path,
            query,
            body,
            content_type,
            request_uid,
        })
    }

    fn build_path(
        &self,
        operation: Operation,
        descriptor: &OperationDescriptor,
        values: &[(&'static str, String)],
    ) -> VaultResult<String> {
        for (name, _) in values {
            if !descriptor.path_placeholders().any(|p| p == *name) {
                return Err(VaultClientError::invalid(format!(
                    "{name} is not a path parameter of {operation}"
                )));
            }
        }

        let mut path = String::with_capacity(descriptor.path.len());
        for segment in descriptor.path.split('/').skip(1) {
            path.push('/');
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| value)
                        .filter(|value| !value.is_empty())
                        .ok_or_else(|| {
                            VaultClientError::invalid(format!("{name} is required"))
                        })?;
                    path.push_str(&encode_path_segment(value));
                }
                None => path.push_str(segment),
            }
        }
        Ok(self.join_prefix(&path))
    }

    fn join_prefix(&self, path: &str) -> String {
        match (self.path_prefix.is_empty(), path) {
            (true, _) => path.to_owned(),
            (false, "/") => self.path_prefix.clone(),
            (false, _) => format!("{}{path}", self.path_prefix),
        }
    }
}

fn check_declared(
    operation: Operation,
    descriptor: &OperationDescriptor,
    fields: &[(&'static str, ParamValue)],
) -> VaultResult<()> {
    for (key, _) in fields {
        let declared = match descriptor.encoding {
            PayloadEncoding::Sideband => descriptor.declares_sideband(key),
            _ => descriptor.declares_param(key),
        };
        if !declared {
            return Err(VaultClientError::invalid(format!(
                "{key} is not a parameter of {operation}"
            )));
        }
    }
    Ok(())
}

fn action_pairs(descriptor: &OperationDescriptor) -> Vec<(String, String)> {
    descriptor
        .action
        .map(|action| {
            vec![
                ("Action".to_owned(), action.to_owned()),
                ("Version".to_owned(), API_VERSION.to_owned()),
            ]
        })
        .unwrap_or_default()
}

fn flat_pairs(fields: &[(&'static str, ParamValue)]) -> Vec<(String, String)> {
    fields
        .iter()
        .flat_map(|(key, value)| {
            value
                .flat_values()
                .into_iter()
                .map(move |v| ((*key).to_owned(), v))
        })
        .collect()
}

fn json_object(fields: &[(&'static str, ParamValue)]) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.to_json()))
        .collect();
    Value::Object(object)
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_query_component(key),
                encode_query_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
