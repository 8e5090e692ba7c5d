pub mod analyze;
pub mod cron;
pub mod crypto;
pub mod health;
pub mod notifications;
pub mod predictions;
pub mod users;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(analyze::router())
        .nest("/api/crypto", crypto::router())
        .nest("/api/predictions", predictions::router())
        .nest("/api/users", users::router())
        .nest("/api/notifications", notifications::router())
        .nest("/api/cron", cron::router())
}
