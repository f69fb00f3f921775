use std::env;
use std::time::Duration;

use crate::analysis::AnalyzerConfig;
use crate::helius::RetryPolicy;
use crate::models::PositionPolicy;

const DEFAULT_HELIUS_API_URL: &str = "https://api.helius.xyz/v0/addresses";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for `/api/*`; `None` disables auth.
    pub api_token: Option<String>,

    // Upstream
    pub helius_api_key: String,
    pub helius_api_url: String,
    pub request_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_ms: u64,

    // Aggregation
    pub position_clamp_at_zero: bool,

    // Telegram
    pub telegram_bot_token: String,
    pub telegram_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            helius_api_key: required("HELIUS_API_KEY")?,
            helius_api_url: env::var("HELIUS_API_URL")
                .unwrap_or_else(|_| DEFAULT_HELIUS_API_URL.into()),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 30)?,
            fetch_max_retries: parse_or("FETCH_MAX_RETRIES", 0)?,
            fetch_retry_backoff_ms: parse_or("FETCH_RETRY_BACKOFF_MS", 500)?,

            position_clamp_at_zero: parse_or("POSITION_CLAMP_AT_ZERO", false)?,

            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_enabled: parse_or("TELEGRAM_ENABLED", true)?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            retry: RetryPolicy {
                max_retries: self.fetch_max_retries,
                base_backoff: Duration::from_millis(self.fetch_retry_backoff_ms),
            },
            position_policy: if self.position_clamp_at_zero {
                PositionPolicy::ClampAtZero
            } else {
                PositionPolicy::Carry
            },
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{key} must be set"))
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}")),
        _ => Ok(default),
    }
}
