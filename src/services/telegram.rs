use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::analysis::WalletAnalyzer;
use crate::helius::TransactionSource;
use crate::models::{WalletReport, WindowStats};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Server-side long-poll duration for `getUpdates`.
const LONG_POLL_SECS: u64 = 30;

/// Pause after a failed poll before trying again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

const WALLET_LINK_BASE: &str = "https://dexcheck.ai/app/wallet-analyzer";

const HELP_TEXT: &str = "Send me a Solana wallet address and I will calculate its win rate \
(overall, last 30 days and last 7 days) from its token transfer history.";

const ANALYZING_TEXT: &str =
    "Analyzing wallet... This may take a while for wallets with many transactions.";

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

// ---------------------------------------------------------------------------
// Bot API types (only the fields we read)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TelegramBot {
    http: Client,
    base_url: String,
    bot_token: String,
}

impl TelegramBot {
    pub fn new(bot_token: impl Into<String>) -> Result<Self, TelegramError> {
        // The HTTP timeout must outlast the server-side long poll.
        let http = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .build()?;
        Ok(Self::with_base_url(http, TELEGRAM_API_BASE, bot_token))
    }

    pub fn with_base_url(
        http: Client,
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            bot_token: bot_token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }

    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });

        let envelope: ApiEnvelope<Vec<Update>> = self
            .http
            .post(self.method_url("getUpdates"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope.description.unwrap_or_else(|| "getUpdates failed".into()),
            ));
        }

        Ok(envelope.result.unwrap_or_default())
    }

    /// Send an HTML message. Failures are logged as warnings.
    pub async fn send_html(&self, chat_id: i64, text: &str) {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "link_preview_options": { "is_disabled": true },
        });

        match self.http.post(self.method_url("sendMessage")).json(&body).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    tracing::warn!(
                        status = %resp.status(),
                        chat_id,
                        "Telegram sendMessage returned non-2xx"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, chat_id, "Failed to send Telegram message");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Analyze(String),
}

/// `/start` and `/help` (optionally `@botname`-suffixed) ask for usage;
/// anything else is taken as a wallet address.
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();
    let head = text.split_whitespace().next().unwrap_or_default();
    let name = head.split('@').next().unwrap_or_default();

    match name {
        "/start" | "/help" => Command::Help,
        _ => Command::Analyze(text.to_string()),
    }
}

/// Long-poll for updates forever, handling each message on its own task.
pub async fn run_bot<S>(bot: TelegramBot, analyzer: Arc<WalletAnalyzer<S>>)
where
    S: TransactionSource + 'static,
{
    tracing::info!("Telegram bot started");
    let mut offset: Option<i64> = None;

    loop {
        let updates = match bot.get_updates(offset, LONG_POLL_SECS).await {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = %e, "Telegram getUpdates failed");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(Message { chat, text: Some(text) }) = update.message else {
                continue;
            };

            let bot = bot.clone();
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move {
                handle_message(&bot, &analyzer, chat.id, &text).await;
            });
        }
    }
}

pub async fn handle_message<S: TransactionSource>(
    bot: &TelegramBot,
    analyzer: &WalletAnalyzer<S>,
    chat_id: i64,
    text: &str,
) {
    let address = match parse_command(text) {
        Command::Help => {
            bot.send_html(chat_id, HELP_TEXT).await;
            return;
        }
        Command::Analyze(address) => address,
    };

    // Acknowledge only addresses that will be fetched. Rejections come back
    // from the analyzer as `InvalidAddress`.
    if analyzer.is_valid_address(&address) {
        bot.send_html(chat_id, ANALYZING_TEXT).await;
    }

    match analyzer.analyze_wallet(&address).await {
        Ok(report) => bot.send_html(chat_id, &format_report(&report)).await,
        Err(e) => bot.send_html(chat_id, e.user_message()).await,
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn format_window(stats: &WindowStats) -> String {
    format!(
        "{:.2}% ({}/{} trades)",
        stats.win_rate_pct, stats.wins, stats.trades
    )
}

/// Render a report as Telegram HTML.
pub fn format_report(report: &WalletReport) -> String {
    format!(
        "Wallet Analysis for <a href=\"{link}/{wallet}\">{wallet}</a>\n\n\
         Win Rates:\n\
         Overall: {overall}\n\
         Last 30 days: {monthly}\n\
         Last 7 days: {weekly}\n\n\
         Total Transactions Analyzed: {total}",
        link = WALLET_LINK_BASE,
        wallet = report.wallet,
        overall = format_window(&report.all_time),
        monthly = format_window(&report.last_30_days),
        weekly = format_window(&report.last_7_days),
        total = report.transactions_analyzed,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_help_commands() {
        assert_eq!(parse_command("/start"), Command::Help);
        assert_eq!(parse_command("  /help  "), Command::Help);
        assert_eq!(parse_command("/start@WinRateBot"), Command::Help);
    }

    #[test]
    fn test_parse_address_is_trimmed() {
        assert_eq!(
            parse_command("  9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM\n"),
            Command::Analyze("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".into())
        );
    }

    #[test]
    fn test_method_url() {
        let bot = TelegramBot::with_base_url(Client::new(), "http://localhost:9000/", "123:abc");
        assert_eq!(bot.method_url("sendMessage"), "http://localhost:9000/bot123:abc/sendMessage");
    }

    #[test]
    fn test_format_report() {
        let report = WalletReport {
            wallet: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".into(),
            transactions_analyzed: 203,
            trades_classified: 150,
            as_of: 1_750_000_000,
            all_time: WindowStats {
                wins: 2,
                trades: 3,
                win_rate_pct: Decimal::new(6667, 2),
            },
            last_30_days: WindowStats {
                wins: 1,
                trades: 1,
                win_rate_pct: Decimal::new(10000, 2),
            },
            last_7_days: WindowStats {
                wins: 0,
                trades: 0,
                win_rate_pct: Decimal::ZERO,
            },
        };

        let text = format_report(&report);

        assert!(text.contains(
            "<a href=\"https://dexcheck.ai/app/wallet-analyzer/9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM\">"
        ));
        assert!(text.contains("Overall: 66.67% (2/3 trades)"));
        assert!(text.contains("Last 30 days: 100.00% (1/1 trades)"));
        assert!(text.contains("Last 7 days: 0.00% (0/0 trades)"));
        assert!(text.ends_with("Total Transactions Analyzed: 203"));
    }

    #[test]
    fn test_decode_updates() {
        let body = r#"{
            "ok": true,
            "result": [
                {"update_id": 7, "message": {"message_id": 1, "chat": {"id": 42, "type": "private"}, "text": "/start"}},
                {"update_id": 8, "edited_message": {"message_id": 1, "chat": {"id": 42}}}
            ]
        }"#;

        let env: ApiEnvelope<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = env.result.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].message.as_ref().unwrap().chat.id, 42);
        assert!(updates[1].message.is_none());
    }
}
