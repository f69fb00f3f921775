pub mod client;
pub mod paginator;
pub mod types;

pub use client::{FetchError, HeliusClient, TransactionSource};
pub use paginator::{fetch_all_transactions, RetryPolicy, PAGE_SIZE};
pub use types::{AmountError, RawTransaction, TokenAmount, TokenTransfer};
