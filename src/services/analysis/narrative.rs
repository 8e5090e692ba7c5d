//! Turkish narrative templating for analysis results.
//!
//! Pure string assembly from indicator values. The output is what the
//! product labels "AI analysis"; there is no model behind it and no
//! randomness in it.

use crate::types::Direction;

/// Momentum magnitude thresholds (percent) for the trend-strength label.
const TREND_WEAK_PCT: f64 = 1.0;
const TREND_MODERATE_PCT: f64 = 3.0;

/// Volatility thresholds as a fraction of the average price.
const VOLATILITY_LOW: f64 = 0.01;
const VOLATILITY_MODERATE: f64 = 0.03;

/// Inputs for narrative generation, all precomputed by the caller.
#[derive(Debug, Clone)]
pub struct NarrativeContext {
    pub coin_id: String,
    pub timeframe: String,
    /// Percent change over the full submitted series.
    pub price_change_pct: f64,
    pub rsi: f64,
    /// Standard deviation of the trailing window.
    pub volatility: f64,
    /// Mean price of the trailing window.
    pub avg_price: f64,
    pub momentum: f64,
    pub direction: Direction,
}

/// Generated reasoning lines plus the combined summary paragraph.
#[derive(Debug, Clone)]
pub struct Narrative {
    /// Independent reasoning strings, in fixed order:
    /// RSI zone, volatility, momentum, price level.
    pub reasoning: Vec<String>,
    pub summary: String,
}

/// RSI zone label: overbought above 70, oversold below 30.
pub fn market_condition(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "aşırı alım"
    } else if rsi < 30.0 {
        "aşırı satım"
    } else {
        "nötr"
    }
}

/// Trend-strength label from momentum magnitude in percent.
pub fn trend_strength(momentum: f64) -> &'static str {
    let magnitude = (momentum * 100.0).abs();
    if magnitude < TREND_WEAK_PCT {
        "zayıf"
    } else if magnitude < TREND_MODERATE_PCT {
        "orta"
    } else {
        "güçlü"
    }
}

/// Volatility label relative to the average price.
pub fn volatility_level(volatility: f64, avg_price: f64) -> &'static str {
    if volatility < avg_price * VOLATILITY_LOW {
        "düşük"
    } else if volatility < avg_price * VOLATILITY_MODERATE {
        "orta"
    } else {
        "yüksek"
    }
}

/// Build the reasoning list and summary paragraph.
pub fn build(ctx: &NarrativeContext) -> Narrative {
    let condition = market_condition(ctx.rsi);
    let strength = trend_strength(ctx.momentum);
    let vol_level = volatility_level(ctx.volatility, ctx.avg_price);
    let momentum_pct = ctx.momentum * 100.0;

    let reasoning = vec![
        format!("RSI {:.2} seviyesinde {} bölgesinde", ctx.rsi, condition),
        format!(
            "{} volatilite ({:.2}) piyasada {} gösteriyor",
            capitalize(vol_level),
            ctx.volatility,
            if vol_level == "yüksek" {
                "risk"
            } else {
                "istikrar"
            }
        ),
        format!(
            "{} momentum ({:.2}%) ile {} yönde hareket",
            capitalize(strength),
            momentum_pct,
            if ctx.momentum > 0.0 {
                "pozitif"
            } else {
                "negatif"
            }
        ),
        format!(
            "Fiyat ortalaması ${:.2} seviyesinde seyrediyor",
            ctx.avg_price
        ),
    ];

    let summary = format!(
        "{} son {}'de {:.2}% değişim gösterdi. \
         Teknik göstergeler {} bölgesinde ve {} bir trend sergiliyor. \
         {} volatilite ile birlikte, momentum {:.2}% seviyesinde. \
         RSI {:.2} değeri ve fiyat hareketleri, {} eğilimini destekliyor.",
        ctx.coin_id.to_uppercase(),
        ctx.timeframe,
        ctx.price_change_pct,
        condition,
        strength,
        vol_level,
        momentum_pct,
        ctx.rsi,
        match ctx.direction {
            Direction::Up => "yükseliş",
            Direction::Down => "düşüş",
        },
    );

    Narrative { reasoning, summary }
}

/// Uppercase the first character. Handles Turkish letters correctly
/// (ü -> Ü and so on) via Unicode case mapping.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
