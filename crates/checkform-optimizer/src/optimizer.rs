//! The iterative prompt optimization loop

use crate::config::OptimizerConfig;
use crate::refine::refinement_fragments;
use crate::state::{OptimizationResult, RoundRecord, TerminalState};
use checkform_domain::{CheckboxRecord, ProviderFailure, RunId, VisionModel};
use checkform_eval::{match_records_with_threshold, score, MetricsReport};
use checkform_extractor::{CheckboxExtractor, PromptBuilder};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one round's extraction attempt
enum RoundExtraction {
    Records(Vec<CheckboxRecord>),
    ParseFailure(String),
    Terminal(String),
}

/// Tunes the extraction prompt against one labeled sample.
///
/// Owns the stopping policy; rounds run strictly sequentially because each
/// round's prompt depends on the previous round's error analysis.
pub struct PromptOptimizer<V>
where
    V: VisionModel,
{
    extractor: CheckboxExtractor<V>,
    config: OptimizerConfig,
}

impl<V> PromptOptimizer<V>
where
    V: VisionModel + Send + Sync + 'static,
    V::Error: std::fmt::Display + ProviderFailure,
{
    /// Create a new optimizer over an extractor
    pub fn new(extractor: CheckboxExtractor<V>, config: OptimizerConfig) -> Self {
        Self { extractor, config }
    }

    /// Run up to `max_rounds` rounds of extract → score → refine.
    ///
    /// Always returns a result: on a terminal extractor failure or an
    /// exhausted budget the best observed (prompt, metrics) pair is
    /// returned rather than aborting without one.
    pub async fn optimize(
        &self,
        seed_prompt: &str,
        sample_png: &[u8],
        ground_truth: &[CheckboxRecord],
        max_rounds: usize,
    ) -> OptimizationResult {
        let run_id = RunId::new();
        let mut fragments: Vec<String> = Vec::new();
        let mut best: Option<(String, MetricsReport)> = None;
        let mut history: Vec<RoundRecord> = Vec::new();
        let mut outcome = TerminalState::BudgetExhausted;

        info!(
            "Starting optimization run {} over {} ground-truth records, {} round budget",
            run_id,
            ground_truth.len(),
            max_rounds
        );

        for round in 1..=max_rounds {
            let prompt = PromptBuilder::new()
                .with_seed(seed_prompt)
                .with_refinements(fragments.clone())
                .build();

            let (records, failure) = match self.run_round(&prompt, sample_png, round).await {
                RoundExtraction::Records(records) => (records, None),
                RoundExtraction::ParseFailure(message) => {
                    // A legitimate, scoreable outcome: zero extracted records.
                    warn!("Round {}: parse failure, scoring as empty: {}", round, message);
                    (Vec::new(), Some(message))
                }
                RoundExtraction::Terminal(message) => {
                    warn!("Round {}: terminal extractor failure: {}", round, message);
                    history.push(RoundRecord {
                        round,
                        prompt,
                        metrics: MetricsReport::from_counts(0, 0, 0),
                        failure: Some(message),
                    });
                    outcome = TerminalState::ExtractorFailed;
                    break;
                }
            };

            let match_outcome = match_records_with_threshold(
                &records,
                ground_truth,
                self.config.similarity_threshold,
            );
            let metrics = score(&match_outcome);

            info!(
                "Round {}: precision {:.3}, recall {:.3}, f1 {:.3} (tp {}, fp {}, fn {})",
                round,
                metrics.precision,
                metrics.recall,
                metrics.f1_score,
                metrics.true_positives,
                metrics.false_positives,
                metrics.false_negatives
            );

            if improves(&metrics, best.as_ref()) {
                best = Some((prompt.clone(), metrics.clone()));
            }

            history.push(RoundRecord {
                round,
                prompt: prompt.clone(),
                metrics: metrics.clone(),
                failure,
            });

            if metrics.meets(self.config.min_precision, self.config.min_recall) {
                info!("Round {}: target met", round);
                // The round that satisfied the requirements is the result,
                // even if an earlier round had a higher F1.
                best = Some((prompt, metrics));
                outcome = TerminalState::TargetMet;
                break;
            }

            if round == max_rounds {
                outcome = TerminalState::BudgetExhausted;
                break;
            }

            fragments = refinement_fragments(&match_outcome);
        }

        let (best_prompt, best_metrics) = best.unwrap_or_else(|| {
            (seed_prompt.to_string(), MetricsReport::from_counts(0, 0, 0))
        });

        info!(
            "Optimization run {} finished: {} after {} round(s), best f1 {:.3}",
            run_id,
            outcome,
            history.len(),
            best_metrics.f1_score
        );

        OptimizationResult {
            run_id: run_id.to_string(),
            outcome,
            best_prompt,
            best_metrics,
            history,
        }
    }

    /// One extraction attempt with a single bounded-backoff retry on
    /// transient failures
    async fn run_round(&self, prompt: &str, sample_png: &[u8], round: usize) -> RoundExtraction {
        let source_id = format!("optimize:round:{}", round);

        match self
            .extractor
            .extract_image(sample_png, &source_id, prompt)
            .await
        {
            Ok(result) => RoundExtraction::Records(result.records),
            Err(e) if e.is_parse() => RoundExtraction::ParseFailure(e.to_string()),
            Err(e) if e.is_transient() => {
                warn!(
                    "Round {}: transient failure ({}), retrying after {}s",
                    round, e, self.config.retry_backoff_secs
                );
                tokio::time::sleep(Duration::from_secs(self.config.retry_backoff_secs)).await;

                match self
                    .extractor
                    .extract_image(sample_png, &source_id, prompt)
                    .await
                {
                    Ok(result) => RoundExtraction::Records(result.records),
                    Err(e) if e.is_parse() => RoundExtraction::ParseFailure(e.to_string()),
                    Err(e) => RoundExtraction::Terminal(e.to_string()),
                }
            }
            Err(e) => RoundExtraction::Terminal(e.to_string()),
        }
    }
}

/// Acceptance policy: Pareto-dominance on (precision, recall), or a
/// strictly greater F1
fn improves(metrics: &MetricsReport, best: Option<&(String, MetricsReport)>) -> bool {
    match best {
        None => true,
        Some((_, incumbent)) => {
            metrics.dominates(incumbent) || metrics.f1_score > incumbent.f1_score
        }
    }
}
