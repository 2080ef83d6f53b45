//! REST API handlers.
//!
//! Handlers are generic over the entity type and call straight into its
//! controller. Mutations return the controller's [`OpResult`].

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use edgegrid_controller::{ControllerError, ControllerResult, ObjApi, Validator};
use edgegrid_core::{Object, OpResult};
use edgegrid_state::StoreError;
use tracing::warn;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
        .into_response()
}

/// HTTP status for a failed controller call.
pub fn status_for(err: &ControllerError) -> StatusCode {
    match err {
        ControllerError::Invalid(_) => StatusCode::BAD_REQUEST,
        ControllerError::Store(StoreError::KeyExists(_)) => StatusCode::CONFLICT,
        ControllerError::Store(StoreError::KeyNotFound(_)) => StatusCode::NOT_FOUND,
        ControllerError::Store(StoreError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn mutation_response(result: ControllerResult<OpResult>, success: StatusCode) -> Response {
    match result {
        Ok(res) => (success, ApiResponse::ok(res)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                warn!(error = %e, "request failed");
            }
            error_response(&e.to_string(), status)
        }
    }
}

// ── Objects ────────────────────────────────────────────────────

/// POST /api/v1/{kind}
pub async fn create<T: Object, V: Validator<T>>(
    State(api): State<Arc<ObjApi<T, V>>>,
    Json(obj): Json<T>,
) -> Response {
    mutation_response(api.create(obj).await, StatusCode::CREATED)
}

/// PUT /api/v1/{kind}
pub async fn update<T: Object, V: Validator<T>>(
    State(api): State<Arc<ObjApi<T, V>>>,
    Json(obj): Json<T>,
) -> Response {
    mutation_response(api.update(obj).await, StatusCode::OK)
}

/// DELETE /api/v1/{kind}
pub async fn delete<T: Object, V: Validator<T>>(
    State(api): State<Arc<ObjApi<T, V>>>,
    Json(obj): Json<T>,
) -> Response {
    mutation_response(api.delete(obj).await, StatusCode::OK)
}

/// POST /api/v1/{kind}/show
///
/// An empty body object matches everything. Matches are collected and sent
/// as one JSON array, so the sink never fails part way through.
pub async fn show<T: Object, V: Validator<T>>(
    State(api): State<Arc<ObjApi<T, V>>>,
    Json(filter): Json<T>,
) -> Response {
    let mut matched = Vec::new();
    let shown = api
        .show(&filter, |obj| {
            matched.push(obj.clone());
            Ok::<_, Infallible>(())
        })
        .await;
    match shown {
        Ok(()) => ApiResponse::ok(matched).into_response(),
        Err(never) => match never {},
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    ApiResponse::ok("ok")
}
