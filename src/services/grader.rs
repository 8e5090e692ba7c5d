//! Prediction grading job.
//!
//! Pulls every ungraded prediction past its target date, fetches a 1-day
//! price chart per coin, and writes the outcome back. Safe to re-run:
//! already-graded rows are excluded by the store's `result IS NULL`
//! filter, and the result write itself is guarded the same way.

use crate::error::{AppError, Result};
use crate::services::Database;
use crate::sources::CoinGeckoClient;
use crate::types::{Direction, PredictionRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Lookback window (days) for the realized price change.
const GRADING_CHART_DAYS: u32 = 1;

/// Outcome counts for one grading run.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingSummary {
    /// Records that were due at the start of the run.
    pub due: usize,
    /// Records graded by this run.
    pub graded: usize,
    /// Records another run graded first.
    pub skipped: usize,
    /// Records whose fetch or write failed; they stay due for the next run.
    pub failed: usize,
}

/// Grades due predictions against realized market moves.
pub struct Grader {
    db: Arc<Database>,
    market: Arc<CoinGeckoClient>,
}

impl Grader {
    pub fn new(db: Arc<Database>, market: Arc<CoinGeckoClient>) -> Self {
        Self { db, market }
    }

    /// Run one grading pass. Records are processed sequentially; a failure
    /// on one record is logged and does not stop the rest.
    pub async fn run(&self) -> Result<GradingSummary> {
        let now = chrono::Utc::now().timestamp_millis();
        let due = self.db.due_predictions(now)?;

        let mut summary = GradingSummary {
            due: due.len(),
            ..Default::default()
        };

        for prediction in &due {
            match self.grade_one(prediction).await {
                Ok(true) => summary.graded += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(
                        "Failed to grade prediction {} ({}): {}",
                        prediction.id, prediction.coin_id, e
                    );
                    summary.failed += 1;
                }
            }
        }

        if summary.due > 0 {
            info!(
                "Graded {}/{} due predictions ({} failed)",
                summary.graded, summary.due, summary.failed
            );
        }
        Ok(summary)
    }

    /// Grade a single record. Returns whether this call wrote the result.
    async fn grade_one(&self, prediction: &PredictionRecord) -> Result<bool> {
        let chart = self
            .market
            .market_chart(&prediction.coin_id, GRADING_CHART_DAYS)
            .await?;

        let price_change = chart.price_change_pct().ok_or_else(|| {
            AppError::ExternalApi(format!(
                "Not enough chart data for {}",
                prediction.coin_id
            ))
        })?;

        let correct =
            (prediction.prediction_type == Direction::Up) == (price_change > 0.0);

        let updated = self.db.record_result(prediction.id, correct, price_change)?;
        if updated {
            self.notify(prediction, correct, price_change)?;
        }
        Ok(updated)
    }

    fn notify(
        &self,
        prediction: &PredictionRecord,
        correct: bool,
        price_change: f64,
    ) -> Result<()> {
        let message = format!(
            "{} tahmininiz {} çıktı ({:+.2}%)",
            prediction.coin_id,
            if correct { "doğru" } else { "yanlış" },
            price_change,
        );
        self.db
            .create_notification(&prediction.user_id, "Tahmin sonuçlandı", &message)?;
        Ok(())
    }
}
