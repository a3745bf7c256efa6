//! Per-call context.

use tracing::{Span, info_span};
use uuid::Uuid;
use vaultclient_model::Operation;
use vaultclient_model::input::RequestOptions;

/// State of one in-flight call: the operation, its correlation id and the
/// span every log line of the call is recorded in.
#[derive(Debug, Clone)]
pub struct RequestContext {
    operation: Operation,
    request_uid: String,
    span: Span,
}

impl RequestContext {
    /// Open the context for `operation`. A missing or empty request UID in
    /// `options` is replaced by a fresh UUID v4.
    #[must_use]
    pub fn new(operation: Operation, options: &RequestOptions) -> Self {
        let request_uid = options
            .request_uid
            .clone()
            .filter(|uid| !uid.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let span = info_span!(
            "vault_request",
            operation = %operation,
            req_uid = %request_uid,
        );
        Self {
            operation,
            request_uid,
            span,
        }
    }

    /// The operation being performed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Correlation id sent as `x-scal-request-uids`.
    #[must_use]
    pub fn request_uid(&self) -> &str {
        &self.request_uid
    }

    /// Span of the call.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_keep_caller_request_uid() {
        let ctx = RequestContext::new(
            Operation::Healthcheck,
            &RequestOptions::with_request_uid("abc-123"),
        );
        assert_eq!(ctx.request_uid(), "abc-123");
        assert_eq!(ctx.operation(), Operation::Healthcheck);
    }

    #[test]
    fn test_should_generate_request_uid_when_absent() {
        let a = RequestContext::new(Operation::Healthcheck, &RequestOptions::default());
        let b = RequestContext::new(
            Operation::Healthcheck,
            &RequestOptions::with_request_uid(""),
        );
        assert!(Uuid::parse_str(a.request_uid()).is_ok());
        assert!(Uuid::parse_str(b.request_uid()).is_ok());
        assert_ne!(a.request_uid(), b.request_uid());
    }
}
