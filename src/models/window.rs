use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` filter over trade timestamps (unix seconds).
/// Omitted bounds default to the epoch and to "no upper bound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeWindow {
    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The window `[now - span, now]`.
    pub fn trailing(now: i64, span: Duration) -> Self {
        Self::between(now - span.num_seconds(), now)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        let start = self.start.unwrap_or(0);
        let end = self.end.unwrap_or(i64::MAX);
        start <= timestamp && timestamp <= end
    }
}

/// How a sell that exceeds the held position updates the tracked balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPolicy {
    /// Subtract the full sell quantity; the balance may go negative and
    /// further sells are ignored until buys bring it back above zero.
    #[default]
    Carry,
    /// Subtract the sell quantity but never go below zero.
    ClampAtZero,
}

/// Raw win/trade tally for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinRate {
    pub wins: u32,
    pub trades: u32,
}

impl WinRate {
    /// `wins / trades * 100` rounded to two decimals; zero when no trades.
    pub fn percentage(&self) -> Decimal {
        if self.trades == 0 {
            return Decimal::new(0, 2);
        }

        let mut pct = (Decimal::from(self.wins) * Decimal::ONE_HUNDRED
            / Decimal::from(self.trades))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // Always two places, so 50 renders as "50.00".
        pct.rescale(2);
        pct
    }
}
