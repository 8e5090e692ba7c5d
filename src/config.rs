use std::env;

/// Default identity-provider tokeninfo endpoint (Google OAuth2).
const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Default CoinGecko REST API base URL.
const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database path.
    pub database_path: String,
    /// CoinGecko API base URL.
    pub coingecko_api_url: String,
    /// CoinGecko demo API key (optional, raises rate limits).
    pub coingecko_api_key: Option<String>,
    /// Identity-provider tokeninfo endpoint for bearer-token verification.
    pub tokeninfo_url: String,
    /// Shared secret guarding the prediction-grading endpoint.
    pub cron_secret: Option<String>,
    /// Predictions a user may create per day.
    pub daily_prediction_quota: i64,
    /// Hours between prediction creation and its target date.
    pub prediction_window_hours: i64,
    /// Upstream market-data cache TTL in seconds.
    pub market_cache_ttl_secs: u64,
    /// Optional interval for the background grading loop.
    /// When unset, grading only runs via the cron endpoint.
    pub grading_interval_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "artuno.db".to_string()),
            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| DEFAULT_COINGECKO_URL.to_string()),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
            tokeninfo_url: env::var("TOKENINFO_URL")
                .unwrap_or_else(|_| DEFAULT_TOKENINFO_URL.to_string()),
            cron_secret: env::var("CRON_SECRET").ok(),
            daily_prediction_quota: env::var("DAILY_PREDICTION_QUOTA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            prediction_window_hours: env::var("PREDICTION_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            market_cache_ttl_secs: env::var("MARKET_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            grading_interval_secs: env::var("GRADING_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_path: "artuno.db".to_string(),
            coingecko_api_url: DEFAULT_COINGECKO_URL.to_string(),
            coingecko_api_key: None,
            tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            cron_secret: None,
            daily_prediction_quota: 5,
            prediction_window_hours: 24,
            market_cache_ttl_secs: 60,
            grading_interval_secs: None,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = base_config();
        assert_eq!(config.port, 3001);
        assert_eq!(config.daily_prediction_quota, 5);
        assert_eq!(config.prediction_window_hours, 24);
        assert!(config.grading_interval_secs.is_none());
    }

    #[test]
    fn test_config_with_secrets() {
        let config = Config {
            coingecko_api_key: Some("cg-key".to_string()),
            cron_secret: Some("cron-secret".to_string()),
            ..base_config()
        };

        assert_eq!(config.coingecko_api_key.as_deref(), Some("cg-key"));
        assert_eq!(config.cron_secret.as_deref(), Some("cron-secret"));
    }

    #[test]
    fn test_config_clone() {
        let config = base_config();
        let cloned = config.clone();
        assert_eq!(cloned.host, config.host);
        assert_eq!(cloned.database_path, config.database_path);
    }
}
