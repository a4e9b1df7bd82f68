use anyhow::anyhow;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::errors::{ApiError, BadRequestError, InvalidArgument, UserError};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

/// Member returned by the demo API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub member_id: String,
    pub name: String,
}

/// Query parameters for the type conversion demo
#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct DataParams {
    /// Value that must parse as an integer
    pub data: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "exhandler",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Look up a member; a few ids raise each kind of error
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member id, or one of `ex`, `bad`, `user-ex`")
    ),
    responses(
        (status = 200, description = "Member found", body = MemberDto),
        (status = 400, description = "Invalid argument or user error", body = crate::errors::ErrorResult),
        (status = 500, description = "Internal error", body = crate::errors::ErrorResult)
    )
)]
pub async fn get_member(Path(id): Path<String>) -> Result<Json<MemberDto>, ApiError> {
    info!("Get member request: id={}", id);

    match id.as_str() {
        "ex" => Err(anyhow!("member lookup failed for id {}", id).into()),
        "bad" => Err(InvalidArgument::new("invalid input value").into()),
        "user-ex" => Err(UserError::new("user error").into()),
        _ => Ok(Json(MemberDto {
            name: format!("hello {}", id),
            member_id: id,
        })),
    }
}

/// Always rejected as a bad request
#[utoipa::path(
    get,
    path = "/api/response-status-ex1",
    tag = "members",
    responses(
        (status = 400, description = "Bad request", body = crate::errors::ErrorResult)
    )
)]
pub async fn response_status_ex1() -> Result<StatusCode, ApiError> {
    Err(BadRequestError::new().into())
}

/// Bad request carrying runtime detail; clients still see the declared reason
#[utoipa::path(
    get,
    path = "/api/response-status-ex2",
    tag = "members",
    responses(
        (status = 400, description = "Bad request", body = crate::errors::ErrorResult)
    )
)]
pub async fn response_status_ex2() -> Result<StatusCode, ApiError> {
    Err(BadRequestError::with_detail("member id must be numeric").into())
}

/// Parse `data` as an integer; conversion failures are invalid arguments
#[utoipa::path(
    get,
    path = "/api/default-handler-ex",
    tag = "members",
    params(DataParams),
    responses(
        (status = 200, description = "Parsed value", body = serde_json::Value),
        (status = 400, description = "Value is not an integer", body = crate::errors::ErrorResult)
    )
)]
pub async fn default_handler_ex(
    Query(params): Query<DataParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let data: i64 = params
        .data
        .parse()
        .map_err(|e| InvalidArgument::new(format!("data must be an integer: {}", e)))?;

    Ok(Json(serde_json::json!({ "data": data })))
}

/// Panics; answered with the panic error page
pub async fn error_ex() -> StatusCode {
    panic!("unhandled fault in /error-ex");
}

/// Bare 404 without an error body
pub async fn error_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Bare 500 without an error body
pub async fn error_500() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Fallback for requests no route matched
pub async fn route_not_found(uri: axum::http::Uri) -> StatusCode {
    debug!(path = %uri.path(), "No route matched");
    StatusCode::NOT_FOUND
}
