use std::time::Instant;

use chrono::{Duration, Utc};
use metrics::{counter, histogram};

use crate::errors::AnalysisError;
use crate::helius::{fetch_all_transactions, FetchError, RetryPolicy, TransactionSource};
use crate::models::{AnalysisStage, PositionPolicy, TimeWindow, WalletReport};

use super::address::AddressValidator;
use super::classifier::classify_trades;
use super::win_rate::compute_win_rate;

/// Tunables fixed at construction time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerConfig {
    pub retry: RetryPolicy,
    pub position_policy: PositionPolicy,
}

/// Entry point for wallet analysis: validate, fetch every page, classify,
/// then tally all-time / 30-day / 7-day win rates.
///
/// Holds no per-request state, so a single instance can serve concurrent
/// requests.
#[derive(Debug)]
pub struct WalletAnalyzer<S> {
    source: S,
    validator: AddressValidator,
    config: AnalyzerConfig,
}

impl<S: TransactionSource> WalletAnalyzer<S> {
    pub fn new(source: S, config: AnalyzerConfig) -> Self {
        Self {
            source,
            validator: AddressValidator::new(),
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Address grammar check alone, for front-ends that acknowledge a
    /// request before the analysis finishes.
    pub fn is_valid_address(&self, address: &str) -> bool {
        self.validator.is_valid(address)
    }

    pub async fn analyze_wallet(&self, address: &str) -> Result<WalletReport, AnalysisError> {
        self.analyze_wallet_at(address, Utc::now().timestamp()).await
    }

    /// Analyze with `now` (unix seconds) as the end of the trailing windows.
    pub async fn analyze_wallet_at(
        &self,
        address: &str,
        now: i64,
    ) -> Result<WalletReport, AnalysisError> {
        let start = Instant::now();
        counter!("wallet_analyses_total").increment(1);

        let result = self.run(address, now).await;

        histogram!("wallet_analysis_seconds").record(start.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                enter(address, AnalysisStage::Done);
                tracing::info!(
                    wallet = %address,
                    transactions = report.transactions_analyzed,
                    trades = report.trades_classified,
                    overall_pct = %report.all_time.win_rate_pct,
                    "Wallet analysis complete"
                );
            }
            Err(e) => {
                enter(address, AnalysisStage::Failed);
                counter!("wallet_analysis_failures_total", "kind" => e.kind()).increment(1);
                tracing::warn!(wallet = %address, error = %e, kind = e.kind(), "Wallet analysis failed");
            }
        }

        result
    }

    async fn run(&self, address: &str, now: i64) -> Result<WalletReport, AnalysisError> {
        enter(address, AnalysisStage::Validating);
        if !self.validator.is_valid(address) {
            return Err(AnalysisError::InvalidAddress(address.to_string()));
        }

        enter(address, AnalysisStage::Fetching);
        let transactions = fetch_all_transactions(&self.source, address, &self.config.retry).await?;
        if transactions.is_empty() {
            return Err(AnalysisError::NoData(address.to_string()));
        }

        enter(address, AnalysisStage::Classifying);
        let trades = classify_trades(address, &transactions).map_err(FetchError::from)?;
        if trades.is_empty() {
            return Err(AnalysisError::NoData(address.to_string()));
        }

        enter(address, AnalysisStage::Aggregating);
        let policy = self.config.position_policy;
        let overall = compute_win_rate(&trades, TimeWindow::all_time(), policy);
        let monthly = compute_win_rate(&trades, TimeWindow::trailing(now, Duration::days(30)), policy);
        let weekly = compute_win_rate(&trades, TimeWindow::trailing(now, Duration::days(7)), policy);

        Ok(WalletReport {
            wallet: address.to_string(),
            transactions_analyzed: transactions.len(),
            trades_classified: trades.len(),
            as_of: now,
            all_time: overall.into(),
            last_30_days: monthly.into(),
            last_7_days: weekly.into(),
        })
    }
}

fn enter(wallet: &str, stage: AnalysisStage) {
    tracing::debug!(wallet = %wallet, stage = %stage, "Analysis stage");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
