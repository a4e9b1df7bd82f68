//! Turns errors raised by handlers into JSON responses.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::registry::{ErrorKind, ErrorRegistry};
use super::response::ErrorResult;
use crate::metrics::ERRORS_HANDLED_TOTAL;

/// Served when the regular body cannot be produced
const FALLBACK_BODY: &str = r#"{"code":"EX","message":"internal error"}"#;

/// Outcome of classifying an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub body: ErrorResult,
}

/// Maps raised errors to responses through an [`ErrorRegistry`]
#[derive(Debug, Clone, Default)]
pub struct ErrorResponder {
    registry: ErrorRegistry,
}

impl ErrorResponder {
    pub fn new(registry: ErrorRegistry) -> Self {
        Self { registry }
    }

    /// Pick the rule for `error` and build the body it produces
    pub fn resolve(&self, error: &anyhow::Error) -> Resolution {
        let (rule, matched) = self.registry.classify(error);
        Resolution {
            kind: rule.kind,
            status: rule.status,
            body: ErrorResult::new(rule.code, rule.message_for(matched)),
        }
    }

    /// Build the response for `error`. Never fails; the full error is only logged.
    pub fn handle(&self, error: &anyhow::Error) -> Response {
        let resolution = self.resolve(error);

        error!(
            kind = %resolution.kind,
            status = %resolution.status.as_u16(),
            code = %resolution.body.code,
            error = ?error,
            "[exceptionHandler] ex"
        );

        ERRORS_HANDLED_TOTAL
            .with_label_values(&[resolution.kind.as_str(), resolution.status.as_str()])
            .inc();

        let mut response = match serde_json::to_vec(&resolution.body) {
            Ok(body) => json_response(resolution.status, body),
            Err(e) => {
                error!(kind = %resolution.kind, "Failed to serialize error result: {}", e);
                json_response(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.as_bytes().to_vec())
            }
        };
        response.extensions_mut().insert(resolution.kind);
        response
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}

/// Error raised by a handler, parked on the response until the interceptor picks it up
#[derive(Clone)]
pub(crate) struct RaisedError(Arc<anyhow::Error>);

/// Error type for request handlers
///
/// Anything convertible into [`anyhow::Error`] can be returned with `?`. The
/// response it produces is a placeholder that [`exception_interceptor`]
/// replaces with the mapped JSON body.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(RaisedError(Arc::new(self.0)));
        response
    }
}

/// Middleware handing errors raised by handlers to the [`ErrorResponder`]
pub async fn exception_interceptor(
    State(responder): State<Arc<ErrorResponder>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedError>() {
        Some(RaisedError(error)) => responder.handle(&error),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kinds::{BadRequestError, InvalidArgument, UserError};
    use anyhow::anyhow;
    use tracing_test::traced_test;

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_resolve_unclassified_hides_message() {
        let responder = ErrorResponder::default();
        let resolution = responder.resolve(&anyhow!("password=hunter2 rejected by db"));

        assert_eq!(resolution.kind, ErrorKind::Unclassified);
        assert_eq!(resolution.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resolution.body, ErrorResult::internal());
    }

    #[test]
    fn test_resolve_bad_request_uses_declared_reason() {
        let responder = ErrorResponder::default();
        let err = anyhow::Error::new(BadRequestError::with_detail("runtime detail"));
        let resolution = responder.resolve(&err);

        assert_eq!(resolution.status, StatusCode::BAD_REQUEST);
        assert_eq!(resolution.body, ErrorResult::bad("error.bad"));
    }

    #[test]
    fn test_resolve_user_error() {
        let responder = ErrorResponder::default();
        let err = anyhow::Error::new(UserError::new("invalid user id"));
        let resolution = responder.resolve(&err);

        assert_eq!(resolution.status, StatusCode::BAD_REQUEST);
        assert_eq!(resolution.body, ErrorResult::user_ex("invalid user id"));
    }

    #[test]
    fn test_resolve_invalid_argument() {
        let responder = ErrorResponder::default();
        let err = anyhow::Error::new(InvalidArgument::new("must be positive"));
        let resolution = responder.resolve(&err);

        assert_eq!(resolution.status, StatusCode::BAD_REQUEST);
        assert_eq!(resolution.body, ErrorResult::bad("must be positive"));
    }

    #[tokio::test]
    async fn test_handle_sets_status_body_and_marker() {
        let responder = ErrorResponder::default();
        let err = anyhow::Error::new(UserError::new("invalid user id"));
        let response = responder.handle(&err);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            response.extensions().get::<ErrorKind>(),
            Some(&ErrorKind::UserDomain)
        );
        assert_eq!(
            body_bytes(response).await,
            br#"{"code":"USER-EX","message":"invalid user id"}"#.to_vec()
        );
    }

    #[tokio::test]
    async fn test_handle_is_idempotent() {
        let responder = ErrorResponder::default();
        let first = responder.handle(&anyhow::Error::new(InvalidArgument::new("must be positive")));
        let second =
            responder.handle(&anyhow::Error::new(InvalidArgument::new("must be positive")));

        assert_eq!(first.status(), second.status());
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_handle_logs_hidden_message() {
        let responder = ErrorResponder::default();
        let response = responder.handle(&anyhow!("password=hunter2 rejected by db"));

        assert!(logs_contain("[exceptionHandler] ex"));
        assert!(logs_contain("hunter2"));

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(body, r#"{"code":"EX","message":"internal error"}"#);
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn test_fallback_body_matches_internal_result() {
        let parsed: ErrorResult = serde_json::from_str(FALLBACK_BODY).unwrap();
        assert_eq!(parsed, ErrorResult::internal());
    }

    #[test]
    fn test_api_error_parks_raised_error() {
        let response = ApiError::from(UserError::new("invalid user id")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let raised = response.extensions().get::<RaisedError>().unwrap();
        assert_eq!(raised.0.to_string(), "invalid user id");
    }
}
