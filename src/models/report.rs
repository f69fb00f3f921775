use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WinRate;

/// Win/trade tally for one window plus its display percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStats {
    pub wins: u32,
    pub trades: u32,
    pub win_rate_pct: Decimal,
}

impl From<WinRate> for WindowStats {
    fn from(wr: WinRate) -> Self {
        Self {
            wins: wr.wins,
            trades: wr.trades,
            win_rate_pct: wr.percentage(),
        }
    }
}

/// Final output of a wallet analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletReport {
    pub wallet: String,
    /// Raw upstream transactions fetched for the wallet.
    pub transactions_analyzed: usize,
    /// Token transfers that touched the wallet.
    pub trades_classified: usize,
    /// Unix seconds used as "now" for the trailing windows.
    pub as_of: i64,
    pub all_time: WindowStats,
    pub last_30_days: WindowStats,
    pub last_7_days: WindowStats,
}
