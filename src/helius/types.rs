use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Largest decimal exponent, either way, accepted for a token amount.
/// Keeps position arithmetic from aligning absurd scales.
const MAX_AMOUNT_EXPONENT: i64 = 256;

// ---------------------------------------------------------------------------
// Enhanced transaction (address history endpoint)
// ---------------------------------------------------------------------------

/// One record from the address transaction history. Only the fields the
/// analysis needs are decoded; everything else is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawTransaction {
    pub signature: String,
    pub timestamp: i64,
    #[serde(default, rename = "tokenTransfers")]
    pub token_transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenTransfer {
    #[serde(default, rename = "fromUserAccount")]
    pub from_user_account: Option<String>,
    #[serde(default, rename = "toUserAccount")]
    pub to_user_account: Option<String>,
    pub mint: String,
    #[serde(rename = "tokenAmount")]
    pub token_amount: TokenAmount,
}

#[derive(Debug, Error)]
#[error("invalid token amount {raw:?}: {reason}")]
pub struct AmountError {
    raw: String,
    reason: String,
}

/// `tokenAmount` exactly as the upstream wrote it.
///
/// Kept as text until a transfer is known to involve the wallet, so a
/// malformed amount elsewhere in a transaction never fails the analysis.
/// Requires `serde_json/arbitrary_precision` so numbers keep their literal
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenAmount(String);

impl TokenAmount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into an arbitrary-precision decimal. Plain, scientific and
    /// quoted forms are accepted.
    pub fn to_decimal(&self) -> Result<BigDecimal, AmountError> {
        let raw = self.0.trim();
        let invalid = |reason: String| AmountError {
            raw: raw.to_string(),
            reason,
        };

        let value = BigDecimal::from_str(raw).map_err(|e| invalid(e.to_string()))?;

        let (_, exponent) = value.as_bigint_and_exponent();
        if exponent.abs() > MAX_AMOUNT_EXPONENT {
            return Err(invalid(format!("exponent {exponent} out of range")));
        }

        Ok(value)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            serde_json::Value::String(s) => Ok(Self(s)),
            other => Err(de::Error::custom(format!(
                "tokenAmount must be a number or string, got {other}"
            ))),
        }
    }
}
