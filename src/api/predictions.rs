//! User prediction endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{Direction, PredictionRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePredictionRequest {
    pub coin_id: Option<String>,
    pub prediction_type: Option<Direction>,
    /// Confidence in [0, 100]; defaults to 50 when the client omits it.
    pub confidence_score: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_prediction).get(list_predictions))
        .route("/:id", delete(delete_prediction))
}

/// POST /api/predictions
///
/// Enforces the daily quota, then creates the record with `result = NULL`
/// and a target date one prediction window ahead.
async fn create_prediction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePredictionRequest>,
) -> Result<Json<PredictionRecord>> {
    let user = state.auth.authenticate(&headers).await?;

    let (Some(coin_id), Some(prediction_type)) = (request.coin_id, request.prediction_type) else {
        return Err(AppError::BadRequest(
            "Gerekli parametreler eksik".to_string(),
        ));
    };

    let quota = state.config.daily_prediction_quota;
    let now = chrono::Utc::now().timestamp_millis();

    let account = state.db.ensure_user(&user.id, &user.email, quota)?;
    let account = state.db.refresh_daily_quota(&account, quota, now)?;

    if account.daily_predictions_left <= 0 {
        return Err(AppError::QuotaExceeded(
            "Günlük tahmin hakkınız doldu".to_string(),
        ));
    }

    let record = PredictionRecord {
        id: Uuid::new_v4(),
        user_id: user.id.clone(),
        coin_id,
        prediction_type,
        confidence_score: request.confidence_score.unwrap_or(50).clamp(0, 100),
        created_at: now,
        target_date: now + state.config.prediction_window_hours * 3_600_000,
        result: None,
        actual_price_change: None,
    };

    state.db.create_prediction(&record)?;
    state.db.record_prediction_created(&user.id, now)?;

    Ok(Json(record))
}

/// GET /api/predictions — the caller's records, newest first.
async fn list_predictions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PredictionRecord>>> {
    let user = state.auth.authenticate(&headers).await?;
    let predictions = state.db.user_predictions(&user.id)?;
    Ok(Json(predictions))
}

/// DELETE /api/predictions/:id — owner only.
async fn delete_prediction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user = state.auth.authenticate(&headers).await?;

    if state.db.delete_prediction(id, &user.id)? {
        return Ok(Json(json!({ "deleted": true })));
    }

    // Distinguish someone else's record from a missing one.
    if state.db.get_prediction(id)?.is_some() {
        Err(AppError::Forbidden(
            "Prediction belongs to another user".to_string(),
        ))
    } else {
        Err(AppError::NotFound("Prediction not found".to_string()))
    }
}
