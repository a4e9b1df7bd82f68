use utoipa::OpenApi;

use crate::api::handlers::{DataParams, MemberDto};
use crate::errors::{ErrorCode, ErrorResult};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "exhandler",
        version = "0.1.0",
        description = "Demonstrates centralized error handling: application errors become JSON error results with explicit status codes, status-only failures are served static error pages."
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::get_member,
        crate::api::handlers::response_status_ex1,
        crate::api::handlers::response_status_ex2,
        crate::api::handlers::default_handler_ex,
    ),
    components(
        schemas(
            ErrorResult,
            ErrorCode,
            MemberDto,
            DataParams,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "members", description = "Endpoints raising each kind of application error"),
    )
)]
pub struct ApiDoc;
