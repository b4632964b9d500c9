//! Route handlers for the item CRUD surface.
//!
//! # Responsibilities
//! - Validate inbound parameters (malformed input never reaches the core)
//! - Invoke the matching gateway operation
//! - Render the terminal result as JSON
//!
//! Validation failures return 400 with a `detail` body; everything else is
//! the gateway's terminal mapping.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::http::response::{
    bad_request, ItemCreated, ItemDeleted, ItemList, ItemUpdated,
};
use crate::http::server::AppState;
use crate::rpc::proto::Item;

/// POST /items
pub async fn create_item(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let id = body.get("id").and_then(Value::as_i64);
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let (Some(id), Some(name)) = (id, name) else {
        return bad_request("Request must include 'id' and 'name'.");
    };

    let item = Item {
        id,
        name: name.to_string(),
    };
    match state.gateway.create_item(item).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(ItemCreated {
                message: "Item added successfully.",
                item,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Query parameters for GET /items. Zero/empty means "not given", matching
/// the backend's filter semantics.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub name: String,
}

/// GET /items
pub async fn list_items(State(state): State<AppState>, Query(query): Query<ItemQuery>) -> Response {
    if query.item_id == 0 && query.name.is_empty() {
        return bad_request("Provide 'id' or 'name'.");
    }

    let filter = Item {
        id: query.item_id,
        name: query.name,
    };
    match state.gateway.get_items(filter).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ItemList {
                message: "Items retrieved successfully.",
                items,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// PUT /items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let Some(name) = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
    else {
        return bad_request("The 'name' field is required in the request body.");
    };

    let item = Item {
        id: item_id,
        name: name.to_string(),
    };
    match state.gateway.update_item(item).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ItemUpdated {
                message: format!("Item {item_id} updated successfully."),
                old_item: updated.old,
                new_item: updated.new,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// DELETE /items/{item_id}
pub async fn delete_item(State(state): State<AppState>, Path(item_id): Path<i64>) -> Response {
    match state.gateway.delete_item(item_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ItemDeleted {
                message: "Successfully deleted item.",
                deleted_item: item,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /metrics — Prometheus exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
        .into_response()
}
