//! CoinGecko REST client.
//!
//! All reads go through a short-lived response cache. The free tier rate
//! limits aggressively; a 429 is retried exactly once after a fixed delay,
//! then surfaced as an upstream error.

use crate::error::{AppError, Result};
use crate::services::Cache;
use crate::types::{CoinMarket, MarketChart};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed wait before the single rate-limit retry.
const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// CoinGecko REST client with response caching.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Cache<Value>,
}

impl CoinGeckoClient {
    /// Create a new client. `cache_ttl` bounds how stale proxied market
    /// data may be.
    pub fn new(base_url: String, api_key: Option<String>, cache_ttl: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Artuno/0.1 (Crypto Dashboard Backend)")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
            cache: Cache::new(cache_ttl),
        }
    }

    /// Top coins by market cap.
    pub async fn markets(&self, limit: u32) -> Result<Vec<CoinMarket>> {
        let path = format!(
            "/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            limit
        );
        let value = self.get_json(&path).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::ExternalApi(format!("Malformed CoinGecko response: {}", e)))
    }

    /// Full coin detail document, passed through untyped.
    pub async fn coin_detail(&self, coin_id: &str) -> Result<Value> {
        let path = format!(
            "/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
            coin_id
        );
        self.get_json(&path).await
    }

    /// Price history for the last `days` days.
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart> {
        let path = format!(
            "/coins/{}/market_chart?vs_currency=usd&days={}",
            coin_id, days
        );
        let value = self.get_json(&path).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::ExternalApi(format!("Malformed CoinGecko response: {}", e)))
    }

    /// Cached GET returning the raw JSON body.
    async fn get_json(&self, path: &str) -> Result<Value> {
        if let Some(cached) = self.cache.get(path) {
            debug!("CoinGecko cache hit: {}", path);
            return Ok(cached);
        }

        let mut response = self.send(path).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!("CoinGecko rate limited, retrying once: {}", path);
            tokio::time::sleep(RATE_LIMIT_RETRY_DELAY).await;
            response = self.send(path).await?;
        }

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "CoinGecko API error: {}",
                status
            )));
        }

        let value: Value = response.json().await?;
        self.cache.set(path.to_string(), value.clone());
        Ok(value)
    }

    async fn send(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(ref key) = self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }
        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markets_payload_deserializes() {
        let payload = serde_json::json!([
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "image": "https://example.com/btc.png",
                "current_price": 42000.0,
                "market_cap": 800_000_000_000.0,
                "total_volume": 30_000_000_000.0,
                "price_change_percentage_24h": -1.2
            },
            {
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum"
            }
        ]);

        let markets: Vec<CoinMarket> = serde_json::from_value(payload).unwrap();
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].id, "bitcoin");
        assert_eq!(markets[0].current_price, Some(42000.0));
        assert!(markets[1].current_price.is_none());
    }

    #[test]
    fn test_market_chart_payload_deserializes() {
        let payload = serde_json::json!({
            "prices": [[1700000000000i64, 42000.0], [1700003600000i64, 42100.0]],
            "market_caps": [],
            "total_volumes": []
        });

        let chart: MarketChart = serde_json::from_value(payload).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[1].1, 42100.0);
    }
}
