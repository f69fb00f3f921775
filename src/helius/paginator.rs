use std::time::Duration;

use metrics::counter;

use super::client::{FetchError, TransactionSource};
use super::types::RawTransaction;

/// Records requested per page. A page shorter than this is taken as the
/// last one; the upstream does not promise that, but it has held in practice
/// and saves a round-trip per wallet.
pub const PAGE_SIZE: usize = 100;

/// Bounded retry for a single page fetch. `max_retries = 0` fails on the
/// first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Walk a wallet's full history by following the `before` cursor.
///
/// Pages are fetched strictly one after another since each cursor is the
/// last signature of the previous page. Any page failure aborts the walk and
/// whatever was already collected is dropped.
pub async fn fetch_all_transactions<S: TransactionSource>(
    source: &S,
    wallet: &str,
    retry: &RetryPolicy,
) -> Result<Vec<RawTransaction>, FetchError> {
    let mut all: Vec<RawTransaction> = Vec::new();
    let mut before: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch_page_with_retry(source, wallet, before.as_deref(), retry).await?;
        pages += 1;
        counter!("upstream_pages_fetched_total").increment(1);

        let Some(last) = page.last() else {
            break;
        };
        let is_last_page = page.len() < PAGE_SIZE;
        before = Some(last.signature.clone());

        counter!("upstream_transactions_fetched_total").increment(page.len() as u64);
        all.extend(page);

        tracing::info!(
            wallet = %wallet,
            pages,
            fetched = all.len(),
            "Fetched {} transactions so far",
            all.len()
        );

        if is_last_page {
            break;
        }
    }

    tracing::debug!(wallet = %wallet, pages, total = all.len(), "Pagination complete");

    Ok(all)
}

async fn fetch_page_with_retry<S: TransactionSource>(
    source: &S,
    wallet: &str,
    before: Option<&str>,
    retry: &RetryPolicy,
) -> Result<Vec<RawTransaction>, FetchError> {
    let mut attempt = 0u32;

    loop {
        match source.fetch_page(wallet, before, PAGE_SIZE).await {
            Ok(page) => return Ok(page),
            Err(e) if attempt < retry.max_retries && e.is_retryable() => {
                let delay = retry.backoff(attempt);
                tracing::warn!(
                    error = %e,
                    wallet = %wallet,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Page fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, wallet = %wallet, "Page fetch failed");
                return Err(e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
