pub mod address;
pub mod analyzer;
pub mod classifier;
pub mod win_rate;

pub use address::AddressValidator;
pub use analyzer::{AnalyzerConfig, WalletAnalyzer};
pub use classifier::{classify_trades, classify_transfer};
pub use win_rate::compute_win_rate;
