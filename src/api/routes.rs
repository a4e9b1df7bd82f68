use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    default_handler_ex, error_404, error_500, error_ex, get_member, health, response_status_ex1,
    response_status_ex2, route_not_found,
};
use super::middleware::logging_middleware;
use super::openapi::ApiDoc;
use crate::errors::{exception_interceptor, ErrorResponder};
use crate::metrics;
use crate::pages::{error_page_forwarder, handle_panic, page_routes, ErrorPages, PageForwarder};

/// Build the application router.
///
/// `responder` answers errors raised by handlers; `pages` answers responses that end
/// with a bare status or a panic. Both are fixed for the lifetime of the router.
pub fn create_router(responder: Arc<ErrorResponder>, pages: ErrorPages) -> Router {
    let forwarder = PageForwarder::new(pages, page_routes());

    Router::new()
        // Health check
        .route("/health", get(health))
        // Application errors answered with an error result
        .route("/api/members/:id", get(get_member))
        .route("/api/response-status-ex1", get(response_status_ex1))
        .route("/api/response-status-ex2", get(response_status_ex2))
        .route("/api/default-handler-ex", get(default_handler_ex))
        // Status-only failures answered with an error page
        .route("/error-ex", get(error_ex))
        .route("/error-404", get(error_404))
        .route("/error-500", get(error_500))
        .merge(page_routes())
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        // Add middleware (order matters: interceptor -> panic -> error pages -> metrics -> logging -> trace)
        .layer(middleware::from_fn_with_state(
            responder,
            exception_interceptor,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            forwarder,
            error_page_forwarder,
        ))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
