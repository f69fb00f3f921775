use std::sync::Arc;

use walletbot::analysis::WalletAnalyzer;
use walletbot::api::router::create_router;
use walletbot::config::AppConfig;
use walletbot::helius::HeliusClient;
use walletbot::services::{run_bot, TelegramBot};
use walletbot::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = walletbot::metrics::init_metrics()?;

    // One pooled HTTP client shared by every analysis.
    let helius = HeliusClient::from_config(&config)?;
    let analyzer = Arc::new(WalletAnalyzer::new(helius, config.analyzer_config()));

    tracing::info!(
        upstream = %config.helius_api_url,
        timeout_secs = config.request_timeout_secs,
        max_retries = config.fetch_max_retries,
        clamp_at_zero = config.position_clamp_at_zero,
        "Wallet analyzer ready"
    );

    if config.telegram_enabled {
        let bot = TelegramBot::new(&config.telegram_bot_token)?;
        let bot_analyzer = Arc::clone(&analyzer);
        tokio::spawn(async move {
            run_bot(bot, bot_analyzer).await;
        });
    } else {
        tracing::info!("Telegram bot disabled (TELEGRAM_ENABLED=false)");
    }

    let state = AppState {
        config,
        analyzer,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
