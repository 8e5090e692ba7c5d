use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a price prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Column value used in SQLite.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// A persisted user prediction.
///
/// Created with `result = None`; the grading job sets `result` and
/// `actual_price_change` exactly once after `target_date` has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub coin_id: String,
    pub prediction_type: Direction,
    /// Confidence score in [0, 100].
    pub confidence_score: i64,
    /// Creation time, epoch millis.
    pub created_at: i64,
    /// Grading deadline, epoch millis.
    pub target_date: i64,
    /// `true` when the predicted direction matched the realized move.
    pub result: Option<bool>,
    /// Realized percent change measured by the grading job.
    pub actual_price_change: Option<f64>,
}

impl PredictionRecord {
    /// Whether the record is due for grading at `now` (epoch millis).
    pub fn is_due(&self, now: i64) -> bool {
        self.result.is_none() && self.target_date < now
    }
}
