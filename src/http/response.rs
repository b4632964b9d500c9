//! Client-facing response shapes and error mapping.
//!
//! # Responsibilities
//! - JSON envelopes for the four item operations
//! - Map `GatewayError` onto HTTP status codes
//!
//! Bodies keep the deployed service's message wording so existing clients
//! keep working.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gateway::GatewayError;
use crate::rpc::proto::Item;

#[derive(Debug, Serialize)]
pub struct ItemCreated {
    pub message: &'static str,
    pub item: Item,
}

#[derive(Debug, Serialize)]
pub struct ItemList {
    pub message: &'static str,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct ItemUpdated {
    pub message: String,
    pub old_item: Item,
    pub new_item: Item,
}

#[derive(Debug, Serialize)]
pub struct ItemDeleted {
    pub message: &'static str,
    pub deleted_item: Item,
}

/// Body for 4xx/5xx errors with a specific cause.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Body for 503s where the backend is the problem, not the request.
#[derive(Debug, Serialize)]
pub struct ServiceError {
    pub status: &'static str,
    pub message: &'static str,
}

pub fn bad_request(detail: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorDetail {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(ErrorDetail { detail })).into_response()
            }
            GatewayError::Conflict(detail) => {
                (StatusCode::CONFLICT, Json(ErrorDetail { detail })).into_response()
            }
            GatewayError::Backend(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail {
                    detail: format!("gRPC-service failure: {detail}"),
                }),
            )
                .into_response(),
            GatewayError::CircuitOpen => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceError {
                    status: "error",
                    message:
                        "Service unavailable. The circuit breaker is open. Please try again later.",
                }),
            )
                .into_response(),
            GatewayError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceError {
                    status: "error",
                    message: "Service unavailable. The backend did not respond. Please try again later.",
                }),
            )
                .into_response(),
        }
    }
}
