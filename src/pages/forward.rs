use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{self, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use tower::ServiceExt;
use tracing::{debug, error, warn};

use super::{ErrorPages, PageTarget};
use crate::errors::ErrorKind;
use crate::metrics::ERROR_PAGES_SERVED_TOTAL;

/// Marks a 500 produced by catching a handler panic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panicked;

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Request handler panicked");

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(Panicked);
    response
}

/// Replaces status-only failures with the page registered for them
#[derive(Clone)]
pub struct PageForwarder {
    pages: ErrorPages,
    router: Router,
}

impl PageForwarder {
    /// `router` resolves page paths; it must not itself be wrapped by the forwarder
    pub fn new(pages: ErrorPages, router: Router) -> Self {
        Self { pages, router }
    }

    fn page_path(&self, response: &Response) -> Option<&str> {
        // Errors already answered with a body keep their response.
        if response.extensions().get::<ErrorKind>().is_some() {
            return None;
        }

        let status = PageTarget::Status(response.status());
        if response.extensions().get::<Panicked>().is_some() {
            return self
                .pages
                .path_for(PageTarget::Panic)
                .or_else(|| self.pages.path_for(status));
        }

        // Only bare statuses are forwarded; a body written by the handler is kept.
        if response.body().size_hint().exact() != Some(0) {
            return None;
        }
        self.pages.path_for(status)
    }

    /// Forward to the error page for `response`, keeping its status
    pub async fn forward(&self, response: Response) -> Response {
        let Some(path) = self.page_path(&response) else {
            return response;
        };
        let status = response.status();

        let request = match http::Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                warn!(path = %path, "Invalid error page path: {}", e);
                return response;
            }
        };

        let page = match self.router.clone().oneshot(request).await {
            Ok(page) => page,
            Err(never) => match never {},
        };

        if !page.status().is_success() {
            warn!(
                path = %path,
                page_status = %page.status().as_u16(),
                "Error page could not be served"
            );
            return response;
        }

        debug!(status = %status.as_u16(), path = %path, "Forwarding to error page");
        ERROR_PAGES_SERVED_TOTAL
            .with_label_values(&[status.as_str()])
            .inc();

        let (mut parts, body) = page.into_parts();
        parts.status = status;
        Response::from_parts(parts, body)
    }
}

/// Middleware applying a [`PageForwarder`] to every response
pub async fn error_page_forwarder(
    State(forwarder): State<PageForwarder>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    forwarder.forward(response).await
}
