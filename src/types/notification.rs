use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-app notification, written by the grading job when a prediction
/// is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    /// Creation time, epoch millis.
    pub created_at: i64,
}
