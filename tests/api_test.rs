//! End-to-end tests running the full router against stubbed upstreams
//! (identity provider and market-data API) on local ports.

use artuno::config::Config;
use artuno::{app, AppState};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

const CRON_SECRET: &str = "cron-secret-test";

async fn tokeninfo_stub(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("id_token").map(String::as_str) {
        Some("valid-token") => {
            Json(json!({ "sub": "user-1", "email": "test@example.com" })).into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn markets_stub() -> Json<Value> {
    Json(json!([
        { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 42000.0 },
        { "id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 2500.0 }
    ]))
}

async fn coin_detail_stub(Path(coin_id): Path<String>) -> Json<Value> {
    Json(json!({ "id": coin_id, "symbol": "btc", "name": "Bitcoin" }))
}

async fn market_chart_stub(Path(_coin_id): Path<String>) -> Json<Value> {
    Json(json!({
        "prices": [[1_700_000_000_000_i64, 100.0], [1_700_003_600_000_i64, 105.0]],
        "market_caps": [],
        "total_volumes": []
    }))
}

async fn spawn_upstream_stub() -> String {
    let app = Router::new()
        .route("/tokeninfo", get(tokeninfo_stub))
        .route("/coins/markets", get(markets_stub))
        .route("/coins/:coin_id", get(coin_detail_stub))
        .route("/coins/:coin_id/market_chart", get(market_chart_stub));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Boot the full application against the stub upstream. Returns the
/// server's base URL.
async fn spawn_app(quota: i64) -> String {
    let upstream = spawn_upstream_stub().await;
    spawn_app_against(upstream, quota).await
}

/// Boot the application against an arbitrary upstream base URL.
async fn spawn_app_against(upstream: String, quota: i64) -> String {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".to_string(),
        coingecko_api_url: upstream.clone(),
        coingecko_api_key: None,
        tokeninfo_url: format!("{}/tokeninfo", upstream),
        cron_secret: Some(CRON_SECRET.to_string()),
        daily_prediction_quota: quota,
        prediction_window_hours: 24,
        market_cache_ttl_secs: 60,
        grading_interval_secs: None,
    };

    let state = AppState::from_config(config).unwrap();
    let router = app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_app(5).await;
    let response = reqwest::get(format!("{}/api/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_analyze_requires_all_parameters() {
    let base = spawn_app(5).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({ "coinId": "bitcoin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Gerekli parametreler eksik");
}

#[tokio::test]
async fn test_analyze_returns_full_payload() {
    let base = spawn_app(5).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/analyze", base))
        .json(&json!({
            "coinId": "bitcoin",
            "prices": [
                [1_700_000_000_000_i64, 100.0],
                [1_700_003_600_000_i64, 102.0],
                [1_700_007_200_000_i64, 101.0],
                [1_700_010_800_000_i64, 105.0],
                [1_700_014_400_000_i64, 103.0],
                [1_700_018_000_000_i64, 108.0]
            ],
            "timeframe": "24h"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!((body["prediction"].as_f64().unwrap() - 8.0).abs() < 1e-9);
    assert_eq!(body["trend"], "up");
    assert_eq!(body["technicalIndicators"]["rsi"], 50.0);
    assert_eq!(body["modelInfo"]["name"], "Artuno AI v1.0");
    assert_eq!(body["historicalPrices"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_crypto_proxy_endpoints() {
    let base = spawn_app(5).await;

    let markets: Value = reqwest::get(format!("{}/api/crypto/markets?limit=2", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(markets.as_array().unwrap().len(), 2);
    assert_eq!(markets[0]["id"], "bitcoin");

    let detail: Value = reqwest::get(format!("{}/api/crypto/bitcoin", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["id"], "bitcoin");

    let chart: Value = reqwest::get(format!("{}/api/crypto/bitcoin/market-chart?days=1", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chart["prices"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_prediction_flow_with_quota() {
    let base = spawn_app(2).await;
    let client = reqwest::Client::new();

    // Unauthenticated and badly authenticated requests are rejected.
    let response = client
        .get(format!("{}/api/predictions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/api/users/me", base))
        .bearer_auth("bad-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // First sight of a verified identity creates the profile row.
    let me: Value = client
        .get(format!("{}/api/users/me", base))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], "test@example.com");
    assert_eq!(me["dailyPredictionsLeft"], 2);

    let first: Value = client
        .post(format!("{}/api/predictions", base))
        .bearer_auth("valid-token")
        .json(&json!({ "coinId": "bitcoin", "predictionType": "up" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["coinId"], "bitcoin");
    assert_eq!(first["confidenceScore"], 50);
    assert!(first["result"].is_null());

    // Keep created_at timestamps distinct for the ordering check.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let second: Value = client
        .post(format!("{}/api/predictions", base))
        .bearer_auth("valid-token")
        .json(&json!({ "coinId": "ethereum", "predictionType": "down", "confidenceScore": 80 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["confidenceScore"], 80);

    // Quota of two is now spent.
    let response = client
        .post(format!("{}/api/predictions", base))
        .bearer_auth("valid-token")
        .json(&json!({ "coinId": "solana", "predictionType": "up" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Günlük tahmin hakkınız doldu");

    let me: Value = client
        .get(format!("{}/api/users/me", base))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["dailyPredictionsLeft"], 0);
    assert_eq!(me["totalPredictions"], 2);

    let listed: Value = client
        .get(format!("{}/api/predictions", base))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["coinId"], "ethereum");

    let response = client
        .delete(format!("{}/api/predictions/{}", base, first["id"].as_str().unwrap()))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .delete(format!(
            "{}/api/predictions/00000000-0000-0000-0000-000000000001",
            base
        ))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_notifications_endpoints() {
    let base = spawn_app(5).await;
    let client = reqwest::Client::new();

    let listed: Value = client
        .get(format!("{}/api/notifications", base))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);

    let response = client
        .post(format!(
            "{}/api/notifications/00000000-0000-0000-0000-000000000001/read",
            base
        ))
        .bearer_auth("valid-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

/// CoinGecko serves its error object with HTTP 200 on some plans; the
/// body then fails to deserialize into the expected shape.
async fn error_object_stub() -> Json<Value> {
    Json(json!({
        "status": { "error_code": 10005, "error_message": "rate limit reached" }
    }))
}

#[tokio::test]
async fn test_malformed_upstream_body_maps_to_500() {
    let stub = Router::new()
        .route("/coins/markets", get(error_object_stub))
        .route("/coins/:coin_id/market_chart", get(error_object_stub));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    let base = spawn_app_against(format!("http://{}", addr), 5).await;

    let response = reqwest::get(format!("{}/api/crypto/markets", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Malformed CoinGecko response"));

    let response = reqwest::get(format!("{}/api/crypto/bitcoin/market-chart", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_cron_endpoint_is_guarded() {
    let base = spawn_app(5).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/cron/check-predictions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .post(format!("{}/api/cron/check-predictions", base))
        .bearer_auth("wrong-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let summary: Value = client
        .post(format!("{}/api/cron/check-predictions", base))
        .bearer_auth(CRON_SECRET)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["due"], 0);
    assert_eq!(summary["graded"], 0);
}
