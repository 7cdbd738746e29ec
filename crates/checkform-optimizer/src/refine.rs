//! Deterministic prompt refinement from a round's residual errors
//!
//! Fragments are derived only from the match outcome: missed truths drive a
//! recall clause, spurious predictions drive a precision caution, and
//! state-disputed pairs drive a re-examination clause. Keys are sorted and
//! capped so the same errors always produce the same text.

use checkform_domain::CheckboxKey;
use checkform_eval::MatchOutcome;

/// Most checkbox identities enumerated per fragment
const MAX_ENUMERATED: usize = 10;

/// Derive the next round's refinement fragments from this round's errors.
///
/// Selection follows the limiting metric: missed-checkbox guidance when
/// false negatives dominate, a strictness caution when false positives
/// dominate, both when they balance non-zero. State disagreements get
/// their own clause whenever present, since they degrade both metrics.
pub fn refinement_fragments(outcome: &MatchOutcome) -> Vec<String> {
    let missed = sorted_keys(outcome.unmatched_truths.iter().map(CheckboxKey::from_record));
    let spurious = sorted_keys(
        outcome
            .unmatched_predictions
            .iter()
            .map(CheckboxKey::from_record),
    );
    let disputed = sorted_keys(
        outcome
            .matched
            .iter()
            .filter(|pair| !pair.state_agrees)
            .map(|pair| pair.key.clone()),
    );

    let false_negatives = missed.len() + disputed.len();
    let false_positives = spurious.len() + disputed.len();

    let mut fragments = Vec::new();

    let recall_limited = false_negatives > false_positives;
    let precision_limited = false_positives > false_negatives;
    let balanced = false_negatives == false_positives && false_negatives > 0;

    if (recall_limited || balanced) && !missed.is_empty() {
        fragments.push(recall_fragment(&missed));
    }
    if (precision_limited || balanced) && !spurious.is_empty() {
        fragments.push(precision_fragment(&spurious));
    }
    if !disputed.is_empty() {
        fragments.push(disputed_fragment(&disputed));
    }

    fragments
}

fn recall_fragment(missed: &[CheckboxKey]) -> String {
    let mut text = String::from(
        "An earlier pass missed the checkboxes listed below. Search for each of them explicitly and report every one, even when the mark is faint or the box sits close to other text:",
    );
    text.push_str(&enumerate(missed));
    text
}

fn precision_fragment(spurious: &[CheckboxKey]) -> String {
    let mut text = String::from(
        "An earlier pass reported checkboxes that do not exist on this form. Before marking any box as present, visually confirm both the box outline and its label. Be especially skeptical of:",
    );
    text.push_str(&enumerate(spurious));
    text
}

fn disputed_fragment(disputed: &[CheckboxKey]) -> String {
    let mut text = String::from(
        "An earlier pass misjudged the checked state of the checkboxes below. Re-examine each box closely before deciding whether it is checked or unchecked:",
    );
    text.push_str(&enumerate(disputed));
    text
}

fn enumerate(keys: &[CheckboxKey]) -> String {
    let mut text = String::new();
    for key in keys.iter().take(MAX_ENUMERATED) {
        text.push_str("\n- ");
        text.push_str(&key.to_string());
    }
    if keys.len() > MAX_ENUMERATED {
        text.push_str(&format!("\n- and {} more", keys.len() - MAX_ENUMERATED));
    }
    text
}

fn sorted_keys(keys: impl Iterator<Item = CheckboxKey>) -> Vec<CheckboxKey> {
    let mut collected: Vec<CheckboxKey> = keys.collect();
    collected.sort();
    collected.dedup();
    collected
}
