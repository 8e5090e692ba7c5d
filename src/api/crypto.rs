//! Market-data proxy endpoints (CoinGecko upstream).

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::types::{CoinMarket, MarketChart};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MarketsQuery {
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    days: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/markets", get(get_markets))
        .route("/:coin_id", get(get_coin))
        .route("/:coin_id/market-chart", get(get_market_chart))
}

/// GET /api/crypto/markets?limit=
async fn get_markets(
    State(state): State<AppState>,
    Query(params): Query<MarketsQuery>,
) -> Result<Json<Vec<CoinMarket>>> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let markets = state.market.markets(limit).await?;
    Ok(Json(markets))
}

/// GET /api/crypto/:coin_id
async fn get_coin(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let detail = state.market.coin_detail(&coin_id).await?;
    Ok(Json(detail))
}

/// GET /api/crypto/:coin_id/market-chart?days=
async fn get_market_chart(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<MarketChart>> {
    let days = params.days.unwrap_or(1).clamp(1, 365);
    let chart = state.market.market_chart(&coin_id, days).await?;
    Ok(Json(chart))
}
