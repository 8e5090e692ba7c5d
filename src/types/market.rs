use serde::{Deserialize, Serialize};

/// One row of the CoinGecko `/coins/markets` listing.
///
/// Fields the upstream API occasionally omits are optional so a single
/// partial row cannot fail the whole listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

/// CoinGecko `/coins/{id}/market_chart` response.
///
/// Prices are `[timestamp_ms, price]` pairs in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<(f64, f64)>,
}

impl MarketChart {
    /// Percent change between the first and last chart point.
    /// Returns `None` when fewer than two points are available.
    pub fn price_change_pct(&self) -> Option<f64> {
        if self.prices.len() < 2 {
            return None;
        }
        let start = self.prices.first()?.1;
        let end = self.prices.last()?.1;
        Some((end - start) / start * 100.0)
    }
}
