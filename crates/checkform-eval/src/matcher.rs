//! Pair predicted records to ground-truth records under fuzzy equality

use checkform_domain::{CheckboxKey, CheckboxRecord};
use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Minimum similarity for the fuzzy fallback to accept a pair.
///
/// A candidate pair is taken only when its score strictly exceeds this.
/// 0.85 is a calibration default, not a hard requirement; tune it against
/// real label variance via [`match_records_with_threshold`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// A prediction/truth pair that agreed on identity
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    /// Normalized identity of the truth-side record
    pub key: CheckboxKey,

    /// The predicted record
    pub predicted: CheckboxRecord,

    /// The ground-truth record
    pub truth: CheckboxRecord,

    /// Whether the checked states agree; a disagreement scores as one
    /// false positive plus one false negative
    pub state_agrees: bool,
}

/// Result of matching one prediction set against one truth set.
///
/// The three collections are disjoint and conserve counts:
/// `matched.len() + unmatched_predictions.len()` equals the number of
/// predictions, and `matched.len() + unmatched_truths.len()` equals the
/// number of truths. Contents are sets; they are kept sorted by normalized
/// key so two runs over permuted inputs produce identical values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Identity-matched pairs
    pub matched: Vec<MatchedPair>,

    /// Predicted keys absent from truth (false positives)
    pub unmatched_predictions: Vec<CheckboxRecord>,

    /// Truth keys absent from predictions (false negatives)
    pub unmatched_truths: Vec<CheckboxRecord>,
}

impl MatchOutcome {
    /// Number of predictions consumed by this outcome
    pub fn total_predictions(&self) -> usize {
        self.matched.len() + self.unmatched_predictions.len()
    }

    /// Number of ground-truth records consumed by this outcome
    pub fn total_truths(&self) -> usize {
        self.matched.len() + self.unmatched_truths.len()
    }
}

/// Match with the default similarity threshold
pub fn match_records(predicted: &[CheckboxRecord], truth: &[CheckboxRecord]) -> MatchOutcome {
    match_records_with_threshold(predicted, truth, DEFAULT_SIMILARITY_THRESHOLD)
}

/// Pair predicted records against ground truth.
///
/// Exact matching on normalized keys runs first; the residue goes through a
/// similarity fallback that accepts only mutual-best pairs scoring strictly
/// above `threshold`. Duplicate keys within a side pair off one-to-one in
/// sorted order, so the result is independent of input order.
pub fn match_records_with_threshold(
    predicted: &[CheckboxRecord],
    truth: &[CheckboxRecord],
    threshold: f64,
) -> MatchOutcome {
    let mut preds = keyed_sorted(predicted);
    let truths = keyed_sorted(truth);

    // Exact phase: consume truth records by key, one per prediction.
    let mut truth_pool: BTreeMap<CheckboxKey, VecDeque<CheckboxRecord>> = BTreeMap::new();
    for (key, record) in truths {
        truth_pool.entry(key).or_default().push_back(record);
    }

    let mut matched = Vec::new();
    let mut leftover_preds: Vec<(CheckboxKey, CheckboxRecord)> = Vec::new();

    for (key, pred) in preds.drain(..) {
        match truth_pool.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(truth_record) => matched.push(MatchedPair {
                state_agrees: pred.is_checked == truth_record.is_checked,
                key,
                predicted: pred,
                truth: truth_record,
            }),
            None => leftover_preds.push((key, pred)),
        }
    }

    let leftover_truths: Vec<(CheckboxKey, CheckboxRecord)> = truth_pool
        .into_iter()
        .flat_map(|(key, queue)| queue.into_iter().map(move |r| (key.clone(), r)))
        .collect();

    // Fuzzy phase over the residue. Candidates are swept in descending score
    // order with key-ordered tie-breaks; each accepted pair therefore scores
    // highest for both of its partners among still-unclaimed records, which
    // is the mutual-best rule.
    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for (pi, (pkey, _)) in leftover_preds.iter().enumerate() {
        for (ti, (tkey, _)) in leftover_truths.iter().enumerate() {
            let score = strsim::normalized_levenshtein(&pkey.combined(), &tkey.combined());
            if score > threshold {
                candidates.push((score, pi, ti));
            }
        }
    }
    candidates.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut pred_claimed = vec![false; leftover_preds.len()];
    let mut truth_claimed = vec![false; leftover_truths.len()];

    for (score, pi, ti) in candidates {
        if pred_claimed[pi] || truth_claimed[ti] {
            continue;
        }
        pred_claimed[pi] = true;
        truth_claimed[ti] = true;

        let (_, pred) = &leftover_preds[pi];
        let (tkey, truth_record) = &leftover_truths[ti];
        debug!(
            prediction = %leftover_preds[pi].0,
            truth = %tkey,
            score,
            "fuzzy match accepted"
        );
        matched.push(MatchedPair {
            key: tkey.clone(),
            state_agrees: pred.is_checked == truth_record.is_checked,
            predicted: pred.clone(),
            truth: truth_record.clone(),
        });
    }

    let unmatched_predictions = leftover_preds
        .into_iter()
        .zip(pred_claimed)
        .filter(|(_, claimed)| !claimed)
        .map(|((_, record), _)| record)
        .collect();
    let unmatched_truths = leftover_truths
        .into_iter()
        .zip(truth_claimed)
        .filter(|(_, claimed)| !claimed)
        .map(|((_, record), _)| record)
        .collect();

    matched.sort_by(|a, b| a.key.cmp(&b.key).then(a.predicted.is_checked.cmp(&b.predicted.is_checked)));

    MatchOutcome {
        matched,
        unmatched_predictions,
        unmatched_truths,
    }
}

/// Key every record and sort by (key, state) for order independence
fn keyed_sorted(records: &[CheckboxRecord]) -> Vec<(CheckboxKey, CheckboxRecord)> {
    let mut keyed: Vec<(CheckboxKey, CheckboxRecord)> = records
        .iter()
        .map(|r| (CheckboxKey::from_record(r), r.clone()))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.is_checked.cmp(&b.1.is_checked)));
    keyed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(section: &str, label: &str, checked: bool) -> CheckboxRecord {
        CheckboxRecord::new(section, label, checked)
    }

    #[test]
    fn test_exact_match() {
        let predicted = vec![record("COVERAGES", "CLAIMS-MADE", true)];
        let truth = vec![record("COVERAGES", "CLAIMS-MADE", true)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1);
        assert!(outcome.matched[0].state_agrees);
        assert!(outcome.unmatched_predictions.is_empty());
        assert!(outcome.unmatched_truths.is_empty());
    }

    #[test]
    fn test_exact_match_under_normalization() {
        let predicted = vec![record("Type  of Insurance", "occur.", true)];
        let truth = vec![record("TYPE OF INSURANCE", "OCCUR", true)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1);
    }

    #[test]
    fn test_pure_false_positive() {
        let predicted = vec![record("TYPE OF INSURANCE", "OCCUR", true)];
        let truth = vec![];

        let outcome = match_records(&predicted, &truth);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_predictions.len(), 1);
        assert!(outcome.unmatched_truths.is_empty());
    }

    #[test]
    fn test_pure_false_negative() {
        let predicted = vec![];
        let truth = vec![record("TYPE OF INSURANCE", "ANY AUTO", false)];

        let outcome = match_records(&predicted, &truth);
        assert!(outcome.matched.is_empty());
        assert!(outcome.unmatched_predictions.is_empty());
        assert_eq!(outcome.unmatched_truths.len(), 1);
    }

    #[test]
    fn test_state_disagreement_still_pairs() {
        let predicted = vec![record("X", "Y", true)];
        let truth = vec![record("X", "Y", false)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1);
        assert!(!outcome.matched[0].state_agrees);
    }

    #[test]
    fn test_fuzzy_match_accepts_label_variance() {
        let predicted = vec![record("COVERAGES", "Claims Made", true)];
        let truth = vec![record("COVERAGES", "CLAIMS-MADE", true)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1, "should pair as one identity, not fp+fn");
        assert!(outcome.unmatched_predictions.is_empty());
        assert!(outcome.unmatched_truths.is_empty());
    }

    #[test]
    fn test_fuzzy_match_rejects_below_threshold() {
        let predicted = vec![record("COVERAGES", "UMBRELLA LIAB", true)];
        let truth = vec![record("COVERAGES", "WORKERS COMPENSATION", true)];

        let outcome = match_records(&predicted, &truth);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_predictions.len(), 1);
        assert_eq!(outcome.unmatched_truths.len(), 1);
    }

    #[test]
    fn test_fuzzy_match_no_double_claim() {
        // Two similar predictions, one truth: only one may claim it.
        let predicted = vec![
            record("COVERAGES", "CLAIMS MADE", true),
            record("COVERAGES", "CLAIM-MADE", true),
        ];
        let truth = vec![record("COVERAGES", "CLAIMS-MADE", true)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.unmatched_predictions.len(), 1);
        assert!(outcome.unmatched_truths.is_empty());
    }

    #[test]
    fn test_duplicate_keys_pair_one_to_one() {
        let predicted = vec![record("A", "B", true), record("A", "B", true)];
        let truth = vec![record("A", "B", true)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.unmatched_predictions.len(), 1);
    }

    #[test]
    fn test_order_independence() {
        let predicted = vec![
            record("TYPE OF INSURANCE", "OCCUR", true),
            record("COVERAGES", "Claims Made", false),
            record("LIMITS", "POLICY", true),
        ];
        let truth = vec![
            record("LIMITS", "POLICY", false),
            record("COVERAGES", "CLAIMS-MADE", false),
            record("TYPE OF INSURANCE", "OCCUR", true),
        ];

        let baseline = match_records(&predicted, &truth);

        let mut predicted_rev = predicted.clone();
        predicted_rev.reverse();
        let mut truth_rev = truth.clone();
        truth_rev.reverse();
        let permuted = match_records(&predicted_rev, &truth_rev);

        assert_eq!(baseline, permuted);
    }

    #[test]
    fn test_count_conservation() {
        let predicted = vec![
            record("A", "ONE", true),
            record("A", "TWO", false),
            record("B", "THREE", true),
        ];
        let truth = vec![record("A", "ONE", true), record("C", "FOUR", false)];

        let outcome = match_records(&predicted, &truth);
        assert_eq!(outcome.total_predictions(), predicted.len());
        assert_eq!(outcome.total_truths(), truth.len());
    }
}
