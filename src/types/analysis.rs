use serde::{Deserialize, Serialize};

use super::Direction;

/// Body of `POST /api/analyze`.
///
/// All fields are optional so the handler can report missing parameters
/// with a 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub coin_id: Option<String>,
    /// `[timestamp_ms, price]` pairs, chronological order.
    pub prices: Option<Vec<(f64, f64)>>,
    pub timeframe: Option<String>,
}

/// Indicator snapshot computed once per analyze request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    /// Relative Strength Index, always in [0, 100].
    pub rsi: f64,
    /// EMA(12) - EMA(26).
    pub macd: f64,
    pub sma20: f64,
    pub ema50: f64,
}

/// Direction, confidence and price target derived from the indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPrediction {
    pub direction: Direction,
    /// Bounded to [0, 1].
    pub confidence: f64,
    /// Percent change expected over the next period.
    pub predicted_change_pct: f64,
    pub predicted_price: f64,
}

/// Templated news entry carried in the analyze response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub published_at: String,
    pub sentiment: String,
}

/// One market-analysis paragraph in the analyze response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisEntry {
    pub source: String,
    pub summary: String,
    pub sentiment: String,
    pub timestamp: String,
}

/// Static description of the "model" behind the analysis. The values are
/// product branding carried over verbatim; the computation itself is the
/// deterministic heuristic in `services::analysis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub components: Vec<String>,
    pub methodology: Vec<String>,
    pub accuracy: ModelAccuracy,
    pub update_frequency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAccuracy {
    pub overall: String,
    pub short_term: String,
    pub long_term: String,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Predicted percent change over the next period.
    pub prediction: f64,
    pub predicted_price: f64,
    /// Bounded to [0, 1].
    pub confidence: f64,
    pub trend: Direction,
    pub technical_indicators: TechnicalIndicators,
    pub news: Vec<NewsItem>,
    pub market_analysis: Vec<MarketAnalysisEntry>,
    pub reasoning: Vec<String>,
    pub model_info: ModelInfo,
    /// Prices of the trailing 24-point window.
    pub historical_prices: Vec<f64>,
}
