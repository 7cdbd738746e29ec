//! Confusion-matrix counting and retrieval metrics

use crate::matcher::MatchOutcome;
use serde::{Deserialize, Serialize};

/// Precision/recall/F1 over one evaluated form.
///
/// Raw counts are carried alongside the ratios so downstream reporting and
/// prompt refinement can reason about absolute error volume. Serialized as
/// a flat JSON object with exactly these six fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// `tp / (tp + fp)`, 0 when the denominator is 0
    pub precision: f64,

    /// `tp / (tp + fn)`, 0 when the denominator is 0
    pub recall: f64,

    /// Harmonic mean of precision and recall, 0 when both are 0
    pub f1_score: f64,

    /// Identity-matched pairs whose checked state agrees
    pub true_positives: usize,

    /// Spurious predictions, including state disagreements
    pub false_positives: usize,

    /// Missed truths, including state disagreements
    pub false_negatives: usize,
}

impl MetricsReport {
    /// Compute ratios from raw counts with the zero-denominator conventions.
    ///
    /// Empty-on-empty input yields all zeros; division by zero never turns
    /// into a "perfect" score.
    pub fn from_counts(
        true_positives: usize,
        false_positives: usize,
        false_negatives: usize,
    ) -> Self {
        let tp = true_positives as f64;

        let predicted_total = true_positives + false_positives;
        let precision = if predicted_total == 0 {
            0.0
        } else {
            tp / predicted_total as f64
        };

        let truth_total = true_positives + false_negatives;
        let recall = if truth_total == 0 {
            0.0
        } else {
            tp / truth_total as f64
        };

        let f1_score = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            precision,
            recall,
            f1_score,
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// Whether both configured thresholds are satisfied
    pub fn meets(&self, min_precision: f64, min_recall: f64) -> bool {
        self.precision >= min_precision && self.recall >= min_recall
    }

    /// Pareto dominance on (precision, recall): both at least as good and
    /// at least one strictly better
    pub fn dominates(&self, other: &MetricsReport) -> bool {
        self.precision >= other.precision
            && self.recall >= other.recall
            && (self.precision > other.precision || self.recall > other.recall)
    }
}

/// Reduce a match outcome to a metrics report.
///
/// Pure function of counts; no I/O. A state-disagreeing pair is penalized
/// as harshly as a miss plus a spurious report: one false positive and one
/// false negative, zero true positives.
pub fn score(outcome: &MatchOutcome) -> MetricsReport {
    let mut true_positives = 0;
    let mut false_positives = 0;
    let mut false_negatives = 0;

    for pair in &outcome.matched {
        if pair.state_agrees {
            true_positives += 1;
        } else {
            false_positives += 1;
            false_negatives += 1;
        }
    }

    false_positives += outcome.unmatched_predictions.len();
    false_negatives += outcome.unmatched_truths.len();

    MetricsReport::from_counts(true_positives, false_positives, false_negatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_records;
    use checkform_domain::CheckboxRecord;

    fn record(section: &str, label: &str, checked: bool) -> CheckboxRecord {
        CheckboxRecord::new(section, label, checked)
    }

    #[test]
    fn test_exact_match_scenario() {
        let predicted = vec![record("COVERAGES", "CLAIMS-MADE", true)];
        let truth = vec![record("COVERAGES", "CLAIMS-MADE", true)];

        let metrics = score(&match_records(&predicted, &truth));
        assert_eq!(metrics.true_positives, 1);
        assert_eq!(metrics.false_positives, 0);
        assert_eq!(metrics.false_negatives, 0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_pure_false_positive_scenario() {
        let predicted = vec![record("TYPE OF INSURANCE", "OCCUR", true)];
        let truth = vec![];

        let metrics = score(&match_records(&predicted, &truth));
        assert_eq!(metrics.true_positives, 0);
        assert_eq!(metrics.false_positives, 1);
        assert_eq!(metrics.false_negatives, 0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
    }

    #[test]
    fn test_state_disagreement_counts_both_ways() {
        let predicted = vec![record("X", "Y", true)];
        let truth = vec![record("X", "Y", false)];

        let metrics = score(&match_records(&predicted, &truth));
        assert_eq!(metrics.true_positives, 0);
        assert_eq!(metrics.false_positives, 1);
        assert_eq!(metrics.false_negatives, 1);
    }

    #[test]
    fn test_both_empty_is_all_zero() {
        let metrics = score(&match_records(&[], &[]));
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1_score, 0.0);
    }

    #[test]
    fn test_empty_predictions_nonempty_truth() {
        let truth = vec![record("A", "B", true), record("C", "D", false)];
        let metrics = score(&match_records(&[], &truth));
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.false_negatives, 2);
    }

    #[test]
    fn test_mixed_counts() {
        let predicted = vec![
            record("A", "ONE", true),
            record("A", "TWO", true),
            record("B", "GHOST", true),
        ];
        let truth = vec![
            record("A", "ONE", true),
            record("A", "TWO", false),
            record("C", "MISSED", true),
        ];

        let metrics = score(&match_records(&predicted, &truth));
        // ONE agrees; TWO pairs but disagrees; GHOST spurious; MISSED absent.
        assert_eq!(metrics.true_positives, 1);
        assert_eq!(metrics.false_positives, 2);
        assert_eq!(metrics.false_negatives, 2);
        assert!((metrics.precision - 1.0 / 3.0).abs() < 1e-9);
        assert!((metrics.recall - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_meets_thresholds() {
        let metrics = MetricsReport::from_counts(9, 0, 1);
        assert!(metrics.meets(0.9, 0.9));
        assert!(!metrics.meets(0.97, 0.9));
    }

    #[test]
    fn test_dominance() {
        let a = MetricsReport::from_counts(8, 2, 2);
        let b = MetricsReport::from_counts(9, 1, 1);
        assert!(b.dominates(&a));
        assert!(!a.dominates(&b));
        assert!(!a.dominates(&a));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let metrics = MetricsReport::from_counts(1, 0, 0);
        let json = serde_json::to_value(&metrics).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        assert!(obj.contains_key("precision"));
        assert!(obj.contains_key("recall"));
        assert!(obj.contains_key("f1_score"));
        assert!(obj.contains_key("true_positives"));
        assert!(obj.contains_key("false_positives"));
        assert!(obj.contains_key("false_negatives"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: metrics are always within [0, 1], never NaN
        #[test]
        fn test_metric_bounds(tp in 0usize..100, fp in 0usize..100, fn_ in 0usize..100) {
            let metrics = MetricsReport::from_counts(tp, fp, fn_);
            for value in [metrics.precision, metrics.recall, metrics.f1_score] {
                prop_assert!(value.is_finite());
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
