use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};

use crate::models::{NormalizedTrade, PositionPolicy, TimeWindow, TradeSide, WinRate};

/// Count winning sells inside `window`.
///
/// Trades are replayed in input order while tracking, per token, the
/// quantity bought and not yet sold:
/// - a buy adds to the token's position;
/// - a sell only counts when the position is strictly positive, and is a
///   win when the position covers its full quantity;
/// - a counted sell always reduces the position, per `policy`.
///
/// Sells against an unknown or exhausted position are ignored entirely.
/// Positions live only for this call and are exact at any magnitude.
pub fn compute_win_rate(
    trades: &[NormalizedTrade],
    window: TimeWindow,
    policy: PositionPolicy,
) -> WinRate {
    let mut positions: HashMap<&str, BigDecimal> = HashMap::new();
    let mut result = WinRate::default();

    for trade in trades.iter().filter(|t| window.contains(t.timestamp())) {
        match trade.side() {
            TradeSide::Buy => {
                let held = positions.entry(trade.token_id()).or_insert_with(BigDecimal::zero);
                *held = &*held + trade.quantity();
            }
            TradeSide::Sell => {
                let Some(held) = positions.get_mut(trade.token_id()) else {
                    continue;
                };
                let zero = BigDecimal::zero();
                if *held <= zero {
                    continue;
                }

                result.trades += 1;
                if trade.quantity() <= &*held {
                    result.wins += 1;
                }

                *held = &*held - trade.quantity();
                if policy == PositionPolicy::ClampAtZero && *held < zero {
                    *held = zero;
                }
            }
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
