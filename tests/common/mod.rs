use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use walletbot::analysis::{AnalyzerConfig, WalletAnalyzer};
use walletbot::config::AppConfig;
use walletbot::helius::HeliusClient;

pub const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// In-process stand-in for the transaction history endpoint. Serves
/// `history` through `before`/`limit` pagination and records every request.
/// Can also stall, fail with a status, or answer 200 with a raw body.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    history: Arc<Vec<Value>>,
    fail_with: Option<StatusCode>,
    delay: Option<Duration>,
    raw_body: Option<&'static str>,
    pub requests: Arc<AtomicUsize>,
    pub cursors: Arc<Mutex<Vec<Option<String>>>>,
    pub api_keys: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl FakeUpstream {
    pub fn new(history: Vec<Value>) -> Self {
        Self {
            history: Arc::new(history),
            ..Self::default()
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Answers every page with `200 OK` and `body` verbatim.
    pub fn malformed(body: &'static str) -> Self {
        Self {
            raw_body: Some(body),
            ..Self::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    /// Bind to an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/:wallet/transactions", get(serve_page))
            .with_state(self.clone());
        spawn_router(app).await
    }
}

async fn serve_page(
    State(fake): State<FakeUpstream>,
    Path(_wallet): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.requests.fetch_add(1, Ordering::SeqCst);
    fake.cursors.lock().unwrap().push(params.get("before").cloned());
    if let Some(key) = params.get("api-key") {
        fake.api_keys.lock().unwrap().push(key.clone());
    }

    if let Some(delay) = fake.delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = fake.fail_with {
        return (status, Json(json!({ "error": "upstream failure" }))).into_response();
    }
    if let Some(body) = fake.raw_body {
        return (StatusCode::OK, body).into_response();
    }

    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(100);
    let start = match params.get("before") {
        Some(sig) => fake
            .history
            .iter()
            .position(|tx| tx["signature"] == sig.as_str())
            .map(|i| i + 1)
            .unwrap_or(fake.history.len()),
        None => 0,
    };

    let page: Vec<Value> = fake.history.iter().skip(start).take(limit).cloned().collect();
    (StatusCode::OK, Json(Value::Array(page))).into_response()
}

/// In-process stand-in for the Telegram Bot API that records sent messages.
#[derive(Clone, Default)]
pub struct FakeTelegram {
    pub sent: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
impl FakeTelegram {
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/:bot/sendMessage", post(record_message))
            .with_state(self.clone());
        spawn_router(app).await
    }
}

async fn record_message(
    State(fake): State<FakeTelegram>,
    Path(_bot): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.sent.lock().unwrap().push(body);
    Json(json!({ "ok": true, "result": {} }))
}

async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}

/// A token transfer transaction in the upstream wire format.
#[allow(dead_code)]
pub fn transfer_tx(signature: &str, timestamp: i64, from: &str, to: &str, mint: &str, amount: &str) -> Value {
    let raw = format!(
        r#"{{
            "signature": "{signature}",
            "timestamp": {timestamp},
            "type": "TRANSFER",
            "tokenTransfers": [{{
                "fromUserAccount": "{from}",
                "toUserAccount": "{to}",
                "mint": "{mint}",
                "tokenAmount": {amount}
            }}]
        }}"#
    );
    serde_json::from_str(&raw).expect("valid transaction fixture")
}

#[allow(dead_code)]
pub fn test_config(api_token: Option<&str>) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        api_token: api_token.map(str::to_string),
        helius_api_key: "test-key".into(),
        helius_api_url: "http://127.0.0.1:0".into(),
        request_timeout_secs: 5,
        fetch_max_retries: 0,
        fetch_retry_backoff_ms: 1,
        position_clamp_at_zero: false,
        telegram_bot_token: "123:test".into(),
        telegram_enabled: false,
    }
}

#[allow(dead_code)]
pub fn analyzer_for(base_url: &str) -> WalletAnalyzer<HeliusClient> {
    let client = HeliusClient::new(reqwest::Client::new(), base_url, "test-key");
    WalletAnalyzer::new(client, AnalyzerConfig::default())
}

/// Analyzer whose HTTP client gives up on a page after `timeout`.
#[allow(dead_code)]
pub fn analyzer_with_timeout(base_url: &str, timeout: Duration) -> WalletAnalyzer<HeliusClient> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build test HTTP client");
    WalletAnalyzer::new(HeliusClient::new(http, base_url, "test-key"), AnalyzerConfig::default())
}
