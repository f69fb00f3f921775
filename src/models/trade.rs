use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A token transfer seen from the queried wallet's point of view.
///
/// Built once by the classifier and never mutated afterwards, so fields are
/// only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTrade {
    token_id: String,
    quantity: BigDecimal,
    timestamp: i64,
    side: TradeSide,
}

impl NormalizedTrade {
    /// Quantities are raw token amounts; a negative amount from upstream is
    /// stored by magnitude.
    pub fn new(
        token_id: impl Into<String>,
        quantity: BigDecimal,
        timestamp: i64,
        side: TradeSide,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            quantity: quantity.abs(),
            timestamp,
            side,
        }
    }

    pub fn buy(token_id: impl Into<String>, quantity: BigDecimal, timestamp: i64) -> Self {
        Self::new(token_id, quantity, timestamp, TradeSide::Buy)
    }

    pub fn sell(token_id: impl Into<String>, quantity: BigDecimal, timestamp: i64) -> Self {
        Self::new(token_id, quantity, timestamp, TradeSide::Sell)
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn quantity(&self) -> &BigDecimal {
        &self.quantity
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }
}
