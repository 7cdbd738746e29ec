//! Normalized matching identity for checkbox records

use crate::CheckboxRecord;
use std::fmt;

/// Normalize free text for identity comparison.
///
/// Lowercases, collapses runs of internal whitespace to a single space, and
/// strips leading/trailing punctuation. This absorbs minor transcription
/// variance from the model (e.g. "Claims-Made " vs "CLAIMS-MADE") without
/// touching interior punctuation, which stays significant.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    // Punctuation and whitespace are trimmed together; trimming them in
    // separate passes can expose fresh edge punctuation and lose idempotence.
    collapsed
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

/// The matching identity of a checkbox: normalized (section, label).
///
/// Two records refer to the same checkbox when their keys are equal (or,
/// failing that, similar enough per the matcher's fuzzy fallback). The
/// checked state is deliberately not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckboxKey {
    /// Normalized section text
    pub section: String,

    /// Normalized label text
    pub label: String,
}

impl CheckboxKey {
    /// Build a key from raw section/label text
    pub fn new(section: &str, label: &str) -> Self {
        Self {
            section: normalize_text(section),
            label: normalize_text(label),
        }
    }

    /// Build the key identifying a record
    pub fn from_record(record: &CheckboxRecord) -> Self {
        Self::new(&record.section, &record.label)
    }

    /// Single-string form used for similarity scoring
    pub fn combined(&self) -> String {
        format!("{} / {}", self.section, self.label)
    }
}

impl fmt::Display for CheckboxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.section, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_text("CLAIMS-MADE"), "claims-made");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("TYPE  OF\tINSURANCE"), "type of insurance");
        assert_eq!(normalize_text("  POLICY  "), "policy");
    }

    #[test]
    fn test_normalize_strips_edge_punctuation() {
        assert_eq!(normalize_text("- OCCUR -"), "occur");
        assert_eq!(normalize_text("\"LOC\""), "loc");
    }

    #[test]
    fn test_normalize_keeps_interior_punctuation() {
        assert_eq!(normalize_text("GEN'L AGGREGATE"), "gen'l aggregate");
        assert_eq!(normalize_text("CLAIMS-MADE"), "claims-made");
    }

    #[test]
    fn test_keys_equal_under_variance() {
        let a = CheckboxKey::new("TYPE OF INSURANCE", "  occur");
        let b = CheckboxKey::new("Type  of Insurance", "OCCUR.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_from_record() {
        let record = CheckboxRecord::new("COVERAGES", "Claims-Made", true);
        let key = CheckboxKey::from_record(&record);
        assert_eq!(key.section, "coverages");
        assert_eq!(key.label, "claims-made");
        assert_eq!(key.combined(), "coverages / claims-made");
    }
}
