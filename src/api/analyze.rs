//! Technical analysis endpoint.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::types::{AnalyzeRequest, AnalyzeResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analyze", post(analyze))
}

/// POST /api/analyze
///
/// Pure computation over the submitted price series; no market-data fetch
/// and no persistence happens here.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    let (Some(coin_id), Some(prices), Some(timeframe)) =
        (request.coin_id, request.prices, request.timeframe)
    else {
        return Err(AppError::BadRequest(
            "Gerekli parametreler eksik".to_string(),
        ));
    };

    let response = state.analysis.analyze(&coin_id, &prices, &timeframe)?;
    Ok(Json(response))
}
