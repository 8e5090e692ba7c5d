//! Notification endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::Notification;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/read", post(mark_read))
}

/// GET /api/notifications — the caller's notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>> {
    let user = state.auth.authenticate(&headers).await?;
    let notifications = state.db.user_notifications(&user.id)?;
    Ok(Json(notifications))
}

/// POST /api/notifications/:id/read
async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user = state.auth.authenticate(&headers).await?;

    if state.db.mark_notification_read(id, &user.id)? {
        Ok(Json(json!({ "read": true })))
    } else {
        Err(AppError::NotFound("Notification not found".to_string()))
    }
}
