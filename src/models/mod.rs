pub mod report;
pub mod trade;
pub mod window;

pub use report::{WalletReport, WindowStats};
pub use trade::{NormalizedTrade, TradeSide};
pub use window::{PositionPolicy, TimeWindow, WinRate};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AnalysisStage: orchestrator state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStage {
    Idle,
    Validating,
    Fetching,
    Classifying,
    Aggregating,
    Done,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Idle => "idle",
            AnalysisStage::Validating => "validating",
            AnalysisStage::Fetching => "fetching",
            AnalysisStage::Classifying => "classifying",
            AnalysisStage::Aggregating => "aggregating",
            AnalysisStage::Done => "done",
            AnalysisStage::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
