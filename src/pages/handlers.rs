use axum::{response::Html, routing::get, Router};

const PAGE_404: &str = include_str!("templates/404.html");
const PAGE_500: &str = include_str!("templates/500.html");

pub async fn error_page_404() -> Html<&'static str> {
    Html(PAGE_404)
}

pub async fn error_page_500() -> Html<&'static str> {
    Html(PAGE_500)
}

/// Routes serving the bundled error pages
pub fn page_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/error-page/404", get(error_page_404))
        .route("/error-page/500", get(error_page_500))
}
