//! Checkbox record - the fundamental unit of an extraction

use std::fmt;

/// One checkbox observation on an ACORD 25 form.
///
/// `section` and `label` are free text as transcribed by the vision model or
/// the human labeler; matching identity is derived from them through
/// [`crate::CheckboxKey`], never compared raw. `is_checked` is the value
/// being predicted, not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckboxRecord {
    /// Form section the checkbox belongs to (e.g. "TYPE OF INSURANCE")
    pub section: String,

    /// Text associated with the checkbox (e.g. "CLAIMS-MADE")
    pub label: String,

    /// Whether the box is marked
    pub is_checked: bool,
}

impl CheckboxRecord {
    /// Create a new record
    pub fn new(
        section: impl Into<String>,
        label: impl Into<String>,
        is_checked: bool,
    ) -> Self {
        Self {
            section: section.into(),
            label: label.into(),
            is_checked,
        }
    }
}

impl fmt::Display for CheckboxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_checked { "x" } else { " " };
        write!(f, "[{}] {} / {}", mark, self.section, self.label)
    }
}
