//! Scheduled-job endpoint for prediction grading.

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::services::auth::bearer_token;
use crate::services::GradingSummary;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/check-predictions", post(check_predictions))
}

/// POST /api/cron/check-predictions
///
/// Guarded by a static bearer-token comparison against `CRON_SECRET`;
/// this is a scheduler shared secret, not a user identity.
async fn check_predictions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GradingSummary>> {
    let Some(ref secret) = state.config.cron_secret else {
        return Err(AppError::Unauthorized(
            "Cron secret not configured".to_string(),
        ));
    };

    if bearer_token(&headers) != Some(secret.as_str()) {
        return Err(AppError::Unauthorized("Invalid cron token".to_string()));
    }

    let summary = state.grader.run().await?;
    Ok(Json(summary))
}
