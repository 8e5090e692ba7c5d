//! SQLite persistence for users, predictions and notifications.
//!
//! A single connection behind a mutex is enough here: every write is an
//! independent single-row statement and the request volume is small.

use crate::types::{Direction, Notification, PredictionRecord, UserAccount};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// SQLite store for user accounts, prediction records and notifications.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        info!("SQLite store initialized");
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(db)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                daily_predictions_left INTEGER NOT NULL,
                total_predictions INTEGER NOT NULL DEFAULT 0,
                last_prediction_date INTEGER
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS predictions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                coin_id TEXT NOT NULL,
                prediction_type TEXT NOT NULL,
                confidence_score INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                target_date INTEGER NOT NULL,
                result INTEGER,
                actual_price_change REAL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_user ON predictions(user_id, created_at DESC)",
            [],
        )?;
        // The grading job scans for ungraded rows past their target date.
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_due ON predictions(target_date) WHERE result IS NULL",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at DESC)",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    // ========== User Methods ==========

    /// Get a user profile row.
    pub fn get_user(&self, id: &str) -> Result<Option<UserAccount>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, email, created_at, daily_predictions_left, total_predictions,
                    last_prediction_date
             FROM users WHERE id = ?1",
            params![id],
            map_user,
        )
        .optional()
    }

    /// Create the profile row on first sight, or refresh the email on
    /// subsequent sign-ins. Returns the current row.
    pub fn ensure_user(
        &self,
        id: &str,
        email: &str,
        default_quota: i64,
    ) -> Result<UserAccount, rusqlite::Error> {
        {
            let conn = self.conn.lock().unwrap();
            let now = chrono::Utc::now().timestamp_millis();
            conn.execute(
                "INSERT INTO users (id, email, created_at, daily_predictions_left, total_predictions)
                 VALUES (?1, ?2, ?3, ?4, 0)
                 ON CONFLICT(id) DO UPDATE SET email = excluded.email",
                params![id, email, now, default_quota],
            )?;
        }
        self.get_user(id)?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)
    }

    /// Restore the daily quota (called when a new UTC day has started).
    pub fn reset_daily_quota(&self, id: &str, quota: i64) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET daily_predictions_left = ?1 WHERE id = ?2",
            params![quota, id],
        )?;
        Ok(())
    }

    /// Account for a freshly created prediction: decrement the daily quota,
    /// bump the lifetime counter, stamp the prediction time.
    pub fn record_prediction_created(&self, id: &str, now: i64) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET
                daily_predictions_left = daily_predictions_left - 1,
                total_predictions = total_predictions + 1,
                last_prediction_date = ?1
             WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Restore the quota when the last prediction was made on an earlier
    /// UTC day. Returns the up-to-date row.
    pub fn refresh_daily_quota(
        &self,
        account: &UserAccount,
        quota: i64,
        now: i64,
    ) -> Result<UserAccount, rusqlite::Error> {
        let Some(last) = account.last_prediction_date else {
            return Ok(account.clone());
        };

        let last_day = chrono::DateTime::from_timestamp_millis(last).map(|d| d.date_naive());
        let today = chrono::DateTime::from_timestamp_millis(now).map(|d| d.date_naive());

        if last_day < today {
            self.reset_daily_quota(&account.id, quota)?;
            return self
                .get_user(&account.id)?
                .ok_or(rusqlite::Error::QueryReturnedNoRows);
        }
        Ok(account.clone())
    }

    // ========== Prediction Methods ==========

    /// Insert a new prediction record.
    pub fn create_prediction(&self, record: &PredictionRecord) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO predictions
             (id, user_id, coin_id, prediction_type, confidence_score, created_at,
              target_date, result, actual_price_change)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id.to_string(),
                record.user_id,
                record.coin_id,
                record.prediction_type.as_str(),
                record.confidence_score,
                record.created_at,
                record.target_date,
                record.result,
                record.actual_price_change,
            ],
        )?;
        debug!("Created prediction {} for {}", record.id, record.user_id);
        Ok(())
    }

    /// All predictions for a user, newest first.
    pub fn user_predictions(&self, user_id: &str) -> Result<Vec<PredictionRecord>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, coin_id, prediction_type, confidence_score, created_at,
                    target_date, result, actual_price_change
             FROM predictions WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], map_prediction)?;
        rows.collect()
    }

    /// Look up a single prediction.
    pub fn get_prediction(&self, id: Uuid) -> Result<Option<PredictionRecord>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, user_id, coin_id, prediction_type, confidence_score, created_at,
                    target_date, result, actual_price_change
             FROM predictions WHERE id = ?1",
            params![id.to_string()],
            map_prediction,
        )
        .optional()
    }

    /// Delete a prediction owned by `user_id`. Returns whether a row was
    /// removed.
    pub fn delete_prediction(&self, id: Uuid, user_id: &str) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM predictions WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id],
        )?;
        Ok(affected > 0)
    }

    /// Ungraded predictions whose target date has passed.
    pub fn due_predictions(&self, now: i64) -> Result<Vec<PredictionRecord>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, coin_id, prediction_type, confidence_score, created_at,
                    target_date, result, actual_price_change
             FROM predictions
             WHERE result IS NULL AND target_date < ?1
             ORDER BY target_date ASC",
        )?;
        let rows = stmt.query_map(params![now], map_prediction)?;
        rows.collect()
    }

    /// Write a grading outcome. The `result IS NULL` guard makes re-runs
    /// a no-op for already-graded rows; returns whether this call graded
    /// the record.
    pub fn record_result(
        &self,
        id: Uuid,
        result: bool,
        actual_price_change: f64,
    ) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE predictions SET result = ?1, actual_price_change = ?2
             WHERE id = ?3 AND result IS NULL",
            params![result, actual_price_change, id.to_string()],
        )?;
        Ok(affected > 0)
    }

    // ========== Notification Methods ==========

    /// Create a notification for a user.
    pub fn create_notification(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
    ) -> Result<Notification, rusqlite::Error> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            read: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                notification.id.to_string(),
                notification.user_id,
                notification.title,
                notification.message,
                notification.created_at,
            ],
        )?;
        Ok(notification)
    }

    /// All notifications for a user, newest first.
    pub fn user_notifications(&self, user_id: &str) -> Result<Vec<Notification>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, message, is_read, created_at
             FROM notifications WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let id_str: String = row.get(0)?;
            Ok(Notification {
                id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
                user_id: row.get(1)?,
                title: row.get(2)?,
                message: row.get(3)?,
                read: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect()
    }

    /// Mark a notification as read. Owner-scoped; returns whether a row
    /// was updated.
    pub fn mark_notification_read(&self, id: Uuid, user_id: &str) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id],
        )?;
        Ok(affected > 0)
    }
}

fn map_user(row: &rusqlite::Row<'_>) -> Result<UserAccount, rusqlite::Error> {
    Ok(UserAccount {
        id: row.get(0)?,
        email: row.get(1)?,
        created_at: row.get(2)?,
        daily_predictions_left: row.get(3)?,
        total_predictions: row.get(4)?,
        last_prediction_date: row.get(5)?,
    })
}

fn map_prediction(row: &rusqlite::Row<'_>) -> Result<PredictionRecord, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let type_str: String = row.get(3)?;
    Ok(PredictionRecord {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        coin_id: row.get(2)?,
        prediction_type: type_str.parse().unwrap_or(Direction::Down),
        confidence_score: row.get(4)?,
        created_at: row.get(5)?,
        target_date: row.get(6)?,
        result: row.get(7)?,
        actual_price_change: row.get(8)?,
    })
}
