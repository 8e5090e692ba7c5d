//! User profile endpoints.

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};

use crate::error::Result;
use crate::types::UserAccount;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /api/users/me
///
/// Creates the local profile row on first sight of a verified identity,
/// and rolls the daily quota over when a new UTC day has started.
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<UserAccount>> {
    let user = state.auth.authenticate(&headers).await?;

    let quota = state.config.daily_prediction_quota;
    let now = chrono::Utc::now().timestamp_millis();

    let account = state.db.ensure_user(&user.id, &user.email, quota)?;
    let account = state.db.refresh_daily_quota(&account, quota, now)?;

    Ok(Json(account))
}
