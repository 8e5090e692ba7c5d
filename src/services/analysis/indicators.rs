//! Pure technical-indicator functions over an ordered price series.
//!
//! All functions are deterministic IEEE-754 double arithmetic with no side
//! effects. Series too short for a real calculation return the documented
//! fallback (last price, or neutral 50 for RSI) instead of failing; callers
//! rely on those exact values.

/// Relative Strength Index over the last `period` price transitions.
///
/// Gains and losses are simple averages (not Wilder-smoothed). A zero
/// average loss is treated as 1 to keep RS finite. Fewer than `period + 1`
/// points returns the neutral value 50.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if prices.len() < period + 1 {
        return 50.0;
    }

    let window = &prices[prices.len() - (period + 1)..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    let rs = avg_gain / if avg_loss == 0.0 { 1.0 } else { avg_loss };
    100.0 - (100.0 / (1.0 + rs))
}

/// Exponential Moving Average seeded with the first price.
///
/// Series shorter than `period` return the last price unchanged. That is
/// not a true EMA, but the fallback is load-bearing for callers.
pub fn ema(prices: &[f64], period: usize) -> f64 {
    let Some(&last) = prices.last() else {
        return 0.0;
    };
    if prices.len() < period {
        return last;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = prices[0];
    for &price in &prices[1..] {
        ema = (price - ema) * multiplier + ema;
    }
    ema
}

/// Simple Moving Average of the last `period` prices.
///
/// Series shorter than `period` return the last price.
pub fn sma(prices: &[f64], period: usize) -> f64 {
    let Some(&last) = prices.last() else {
        return 0.0;
    };
    if prices.len() < period {
        return last;
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// MACD line: EMA(12) - EMA(26).
pub fn macd(prices: &[f64]) -> f64 {
    ema(prices, 12) - ema(prices, 26)
}

/// Arithmetic mean of a series. Empty input returns 0.
pub fn mean(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    prices.iter().sum::<f64>() / prices.len() as f64
}

/// Population standard deviation of a series.
pub fn std_dev(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let avg = mean(prices);
    let variance = prices.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / prices.len() as f64;
    variance.sqrt()
}
