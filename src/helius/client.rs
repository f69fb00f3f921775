use std::future::Future;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use super::types::{AmountError, RawTransaction};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Http(e)
        }
    }
}

impl From<AmountError> for FetchError {
    fn from(e: AmountError) -> Self {
        FetchError::Decode(e.to_string())
    }
}

impl FetchError {
    /// Transient failures worth another attempt when retries are enabled.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) | FetchError::Timeout | FetchError::RateLimited => true,
            FetchError::Status(status) => status.is_server_error(),
            FetchError::Decode(_) | FetchError::InvalidUrl(_) => false,
        }
    }
}

/// One page of a wallet's transaction history, newest first, ending just
/// before the `before` signature when one is given.
pub trait TransactionSource: Send + Sync {
    fn fetch_page(
        &self,
        wallet: &str,
        before: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawTransaction>, FetchError>> + Send;
}

/// Client for the Helius address-history endpoint.
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// instance serves every concurrent analysis.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HeliusClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for the configured endpoint with its own pooled HTTP client,
    /// each request bounded by the configured timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::new(http, &config.helius_api_url, &config.helius_api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transactions_url(
        &self,
        wallet: &str,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/{}/transactions",
            self.base_url.trim_end_matches('/'),
            wallet
        );
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-key", &self.api_key);
            query.append_pair("limit", &limit.to_string());
            if let Some(sig) = before {
                query.append_pair("before", sig);
            }
        }

        Ok(url)
    }
}

impl TransactionSource for HeliusClient {
    async fn fetch_page(
        &self,
        wallet: &str,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        let url = self.transactions_url(wallet, before, limit)?;

        tracing::debug!(
            wallet = %wallet,
            before = before.unwrap_or("-"),
            limit,
            "Fetching transaction page"
        );

        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(wallet = %wallet, "Upstream rate limit hit");
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.bytes().await?;
        let page: Vec<RawTransaction> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(page)
    }
}
