//! Round history and terminal states of an optimization run

use checkform_eval::MetricsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the optimization loop stopped.
///
/// No state mutates after one of these is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Current metrics met both configured thresholds
    TargetMet,
    /// The round budget ran out; best observed round is returned
    BudgetExhausted,
    /// The extractor failed terminally (after the one permitted retry)
    ExtractorFailed,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminalState::TargetMet => "target_met",
            TerminalState::BudgetExhausted => "budget_exhausted",
            TerminalState::ExtractorFailed => "extractor_failed",
        };
        write!(f, "{}", s)
    }
}

/// One round of the loop: the prompt used, the metrics observed, and any
/// extraction failure recorded for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index
    pub round: usize,

    /// Full prompt text sent this round
    pub prompt: String,

    /// Metrics for this round; a parse-failed round scores as an empty
    /// prediction set
    pub metrics: MetricsReport,

    /// Extraction failure noted this round, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Final result of one optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// UUIDv7 identifying this run's artifacts
    pub run_id: String,

    /// Why the loop stopped
    pub outcome: TerminalState,

    /// Best prompt observed
    pub best_prompt: String,

    /// Metrics of the best round
    pub best_metrics: MetricsReport,

    /// Every executed round, in order
    pub history: Vec<RoundRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_state_serialization() {
        let json = serde_json::to_string(&TerminalState::BudgetExhausted).unwrap();
        assert_eq!(json, "\"budget_exhausted\"");
        assert_eq!(TerminalState::TargetMet.to_string(), "target_met");
    }

    #[test]
    fn test_round_record_omits_absent_failure() {
        let record = RoundRecord {
            round: 1,
            prompt: "p".to_string(),
            metrics: MetricsReport::from_counts(1, 0, 0),
            failure: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("failure"));
    }
}
