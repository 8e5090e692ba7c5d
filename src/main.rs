use artuno::config::Config;
use artuno::{app, AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artuno=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Artuno server on {}:{}", config.host, config.port);

    let state = AppState::from_config(config)?;

    // Optional background grading loop; the cron endpoint works either way.
    if let Some(interval_secs) = state.config.grading_interval_secs {
        let grader = state.grader.clone();
        info!("Starting background grading loop every {}s", interval_secs);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)).await;
                if let Err(e) = grader.run().await {
                    error!("Grading run failed: {}", e);
                }
            }
        });
    }

    // Start the server
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Artuno server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
