//! Heuristic trend scoring from momentum and RSI.
//!
//! The damping constants and the strict `> 0` direction comparison are
//! behavioral contract: graded predictions and the analyze endpoint both
//! depend on reproducing them exactly.

use crate::types::{Direction, TrendPrediction};

/// RSI level above which further upside is dampened.
const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI level below which a reversal is amplified.
const RSI_OVERSOLD: f64 = 30.0;

/// Raw price momentum: relative change from the start of the window to the
/// last price. Window must be non-empty; a zero start price yields 0.
pub fn momentum(window: &[f64], last_price: f64) -> f64 {
    let Some(&start) = window.first() else {
        return 0.0;
    };
    if start == 0.0 {
        return 0.0;
    }
    (last_price - start) / start
}

/// Derive direction, confidence and a price target.
///
/// `momentum == 0` resolves to `Down` because the comparison is strict;
/// that tie-break is preserved for compatibility.
pub fn score(momentum: f64, rsi: f64, last_price: f64) -> TrendPrediction {
    let damping = if rsi > RSI_OVERBOUGHT {
        0.8
    } else if rsi < RSI_OVERSOLD {
        1.2
    } else {
        1.0
    };

    let predicted_change_pct = momentum * 100.0 * damping;
    let predicted_price = last_price * (1.0 + predicted_change_pct / 100.0);

    let direction = if momentum > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    let confidence = (momentum * 100.0).abs().min(100.0) / 100.0;

    TrendPrediction {
        direction,
        confidence,
        predicted_change_pct,
        predicted_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_from_window() {
        let window = [100.0, 101.0, 102.0];
        assert!((momentum(&window, 105.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_momentum_zero_start_price() {
        assert_eq!(momentum(&[0.0, 1.0], 5.0), 0.0);
    }

    #[test]
    fn test_neutral_rsi_no_damping() {
        let prediction = score(0.05, 50.0, 100.0);
        assert_eq!(prediction.direction, Direction::Up);
        assert!((prediction.confidence - 0.05).abs() < 1e-12);
        assert!((prediction.predicted_change_pct - 5.0).abs() < 1e-12);
        assert!((prediction.predicted_price - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_overbought_damping() {
        let prediction = score(0.05, 75.0, 100.0);
        assert!((prediction.predicted_change_pct - 4.0).abs() < 1e-12);
        assert!((prediction.predicted_price - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_oversold_amplification() {
        let prediction = score(-0.05, 25.0, 100.0);
        assert_eq!(prediction.direction, Direction::Down);
        assert!((prediction.predicted_change_pct - (-6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_exactly_70_is_not_damped() {
        // Thresholds are strict comparisons.
        let prediction = score(0.05, 70.0, 100.0);
        assert!((prediction.predicted_change_pct - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_momentum_resolves_down() {
        let prediction = score(0.0, 50.0, 100.0);
        assert_eq!(prediction.direction, Direction::Down);
        assert_eq!(prediction.confidence, 0.0);
        assert_eq!(prediction.predicted_price, 100.0);
    }

    #[test]
    fn test_confidence_caps_at_one() {
        let prediction = score(2.5, 50.0, 100.0);
        assert_eq!(prediction.confidence, 1.0);
    }
}
