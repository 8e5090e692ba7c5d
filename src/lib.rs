//! Artuno - backend server for the Artuno cryptocurrency dashboard.
//!
//! Serves proxied CoinGecko market data, the deterministic technical
//! analysis endpoint, user prediction CRUD and the grading job endpoint.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::Router;
use config::Config;
use services::{AnalysisService, AuthService, Database, Grader};
use sources::CoinGeckoClient;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers. Clients are constructed once
/// at startup and passed by reference; nothing here is an ambient global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<Database>,
    pub market: Arc<CoinGeckoClient>,
    pub auth: Arc<AuthService>,
    pub analysis: Arc<AnalysisService>,
    pub grader: Arc<Grader>,
}

impl AppState {
    /// Build the full state from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = Arc::new(Database::new(&config.database_path)?);
        let market = Arc::new(CoinGeckoClient::new(
            config.coingecko_api_url.clone(),
            config.coingecko_api_key.clone(),
            Duration::from_secs(config.market_cache_ttl_secs),
        ));
        let auth = Arc::new(AuthService::new(config.tokeninfo_url.clone()));
        let grader = Arc::new(Grader::new(db.clone(), market.clone()));

        Ok(Self {
            config,
            db,
            market,
            auth,
            analysis: Arc::new(AnalysisService::new()),
            grader,
        })
    }
}

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
