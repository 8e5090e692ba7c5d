//! Deterministic technical analysis for the analyze endpoint.
//!
//! Composes the indicator engine, trend scorer and narrative generator
//! into the full response payload. Runs synchronously inside the request
//! handler; no state is shared across requests.

pub mod indicators;
pub mod narrative;
pub mod scorer;

use crate::error::{AppError, Result};
use crate::types::{
    AnalyzeResponse, MarketAnalysisEntry, ModelAccuracy, ModelInfo, NewsItem, TechnicalIndicators,
};
use narrative::NarrativeContext;

/// Trailing window used for momentum, volatility and the returned
/// historical prices (24 hourly points).
const ANALYSIS_WINDOW: usize = 24;

/// RSI lookback period.
const RSI_PERIOD: usize = 14;

/// Stateless analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    window: usize,
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self {
            window: ANALYSIS_WINDOW,
        }
    }
}

impl AnalysisService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full pipeline over `[timestamp_ms, price]` pairs.
    ///
    /// Requires at least two points; everything below an indicator's
    /// lookback uses the documented fallback values instead of failing.
    pub fn analyze(
        &self,
        coin_id: &str,
        series: &[(f64, f64)],
        timeframe: &str,
    ) -> Result<AnalyzeResponse> {
        if series.len() < 2 {
            return Err(AppError::BadRequest(
                "Analiz için en az iki fiyat noktası gerekli".to_string(),
            ));
        }

        let prices: Vec<f64> = series.iter().map(|point| point.1).collect();
        let first_price = prices[0];
        let last_price = prices[prices.len() - 1];
        let price_change_pct = (last_price - first_price) / first_price * 100.0;

        let window = &prices[prices.len().saturating_sub(self.window)..];
        let avg_price = indicators::mean(window);
        let volatility = indicators::std_dev(window);
        let momentum = scorer::momentum(window, last_price);

        let technical_indicators = TechnicalIndicators {
            rsi: indicators::rsi(&prices, RSI_PERIOD),
            macd: indicators::macd(&prices),
            sma20: indicators::sma(&prices, 20),
            ema50: indicators::ema(&prices, 50),
        };

        let trend = scorer::score(momentum, technical_indicators.rsi, last_price);

        let narrative = narrative::build(&NarrativeContext {
            coin_id: coin_id.to_string(),
            timeframe: timeframe.to_string(),
            price_change_pct,
            rsi: technical_indicators.rsi,
            volatility,
            avg_price,
            momentum,
            direction: trend.direction,
        });

        let now = chrono::Utc::now().to_rfc3339();

        Ok(AnalyzeResponse {
            prediction: trend.predicted_change_pct,
            predicted_price: trend.predicted_price,
            confidence: trend.confidence,
            trend: trend.direction,
            technical_indicators,
            news: vec![NewsItem {
                title: format!("{} Piyasa Analizi", coin_id.to_uppercase()),
                url: "https://example.com/analysis".to_string(),
                published_at: now.clone(),
                sentiment: if momentum > 0.0 {
                    "positive".to_string()
                } else {
                    "negative".to_string()
                },
            }],
            market_analysis: vec![MarketAnalysisEntry {
                source: "Teknik Analiz".to_string(),
                summary: narrative.summary,
                sentiment: if momentum > 0.0 {
                    "bullish".to_string()
                } else {
                    "bearish".to_string()
                },
                timestamp: now,
            }],
            reasoning: narrative.reasoning,
            model_info: model_info(),
            historical_prices: window.to_vec(),
        })
    }
}

/// Static product branding for the analyze response.
fn model_info() -> ModelInfo {
    ModelInfo {
        name: "Artuno AI v1.0".to_string(),
        model_type: "Hibrit Tahmin Modeli".to_string(),
        components: vec![
            "Teknik Analiz Modülü (Python/NumPy)".to_string(),
            "Makine Öğrenmesi Modeli (TensorFlow/Keras)".to_string(),
            "Duygu Analizi Motoru (NLTK/Transformers)".to_string(),
        ],
        methodology: vec![
            "Teknik göstergelerin hesaplanması ve analizi".to_string(),
            "Geçmiş fiyat verilerinin zaman serisi analizi".to_string(),
            "Piyasa duyarlılığı ve momentum analizi".to_string(),
            "Volatilite bazlı risk değerlendirmesi".to_string(),
        ],
        accuracy: ModelAccuracy {
            overall: "75-85%".to_string(),
            short_term: "80-90%".to_string(),
            long_term: "70-80%".to_string(),
        },
        update_frequency: "Her 5 dakikada bir".to_string(),
    }
}
