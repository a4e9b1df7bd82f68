//! Static error pages for failures that never reach the error responder

pub mod forward;
pub mod handlers;

use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ErrorPagesConfig;

pub use forward::{error_page_forwarder, handle_panic, PageForwarder, Panicked};
pub use handlers::page_routes;

/// What an error page is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTarget {
    /// A response that ended with this status and no error body
    Status(StatusCode),
    /// A handler that panicked
    Panic,
}

/// A page path registered for a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub target: PageTarget,
    pub path: String,
}

impl ErrorPage {
    pub fn status(status: StatusCode, path: impl Into<String>) -> Self {
        Self {
            target: PageTarget::Status(status),
            path: path.into(),
        }
    }

    pub fn panic(path: impl Into<String>) -> Self {
        Self {
            target: PageTarget::Panic,
            path: path.into(),
        }
    }
}

/// Collects error pages before the router is built
#[derive(Debug, Default)]
pub struct ErrorPagesBuilder {
    pages: Vec<ErrorPage>,
}

impl ErrorPagesBuilder {
    pub fn page(mut self, page: ErrorPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Freeze the mapping. A later page for the same target replaces an earlier one.
    pub fn build(self) -> ErrorPages {
        let pages = self
            .pages
            .into_iter()
            .map(|page| (page.target, page.path))
            .collect();

        ErrorPages {
            pages: Arc::new(pages),
        }
    }
}

/// Read-only page mapping shared by every request
#[derive(Debug, Clone, Default)]
pub struct ErrorPages {
    pages: Arc<HashMap<PageTarget, String>>,
}

impl ErrorPages {
    pub fn builder() -> ErrorPagesBuilder {
        ErrorPagesBuilder::default()
    }

    pub fn from_config(config: &ErrorPagesConfig) -> Self {
        Self::builder()
            .page(ErrorPage::status(StatusCode::NOT_FOUND, &config.not_found))
            .page(ErrorPage::status(
                StatusCode::INTERNAL_SERVER_ERROR,
                &config.internal_error,
            ))
            .page(ErrorPage::panic(&config.panic))
            .build()
    }

    pub fn path_for(&self, target: PageTarget) -> Option<&str> {
        self.pages.get(&target).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
