use crate::helius::{AmountError, RawTransaction, TokenTransfer};
use crate::models::{NormalizedTrade, TradeSide};

/// Turn raw transactions into buys and sells relative to `wallet`.
///
/// Output order follows the input: transactions in the order given, and
/// transfers in the order they appear within each transaction. Only the
/// amounts of transfers involving the wallet are parsed; the first one that
/// fails aborts classification.
pub fn classify_trades(
    wallet: &str,
    transactions: &[RawTransaction],
) -> Result<Vec<NormalizedTrade>, AmountError> {
    let mut trades = Vec::new();

    for tx in transactions {
        for transfer in &tx.token_transfers {
            if let Some(trade) = classify_transfer(wallet, transfer, tx.timestamp)? {
                trades.push(trade);
            }
        }
    }

    Ok(trades)
}

/// Rules:
/// - **Sell**: the wallet is the sending account.
/// - **Buy**: the wallet is the receiving account.
/// - No trade when neither side is the wallet, or when both are (self-transfer).
pub fn classify_transfer(
    wallet: &str,
    transfer: &TokenTransfer,
    timestamp: i64,
) -> Result<Option<NormalizedTrade>, AmountError> {
    let is_from = transfer.from_user_account.as_deref() == Some(wallet);
    let is_to = transfer.to_user_account.as_deref() == Some(wallet);

    let side = match (is_from, is_to) {
        (true, false) => TradeSide::Sell,
        (false, true) => TradeSide::Buy,
        _ => return Ok(None),
    };

    let quantity = transfer.token_amount.to_decimal()?;

    Ok(Some(NormalizedTrade::new(
        transfer.mint.clone(),
        quantity,
        timestamp,
        side,
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
