use serde::{Deserialize, Serialize};

/// Local profile row for an externally authenticated user.
///
/// Identity (id, email) comes from the identity provider; the quota and
/// counters are owned by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Identity-provider subject id.
    pub id: String,
    pub email: String,
    /// Row creation time, epoch millis.
    pub created_at: i64,
    /// Predictions remaining today.
    pub daily_predictions_left: i64,
    /// Lifetime prediction count.
    pub total_predictions: i64,
    /// Time of the most recent prediction, epoch millis.
    pub last_prediction_date: Option<i64>,
}
