pub mod analysis;
pub mod api;
pub mod config;
pub mod errors;
pub mod helius;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::analysis::WalletAnalyzer;
use crate::config::AppConfig;
use crate::helius::HeliusClient;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub analyzer: Arc<WalletAnalyzer<HeliusClient>>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
