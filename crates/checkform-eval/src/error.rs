//! Error types for the evaluation engine

use thiserror::Error;

/// Errors raised at the evaluation boundary.
///
/// Malformed input is rejected with the offending field named; it is never
/// silently coerced.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Top-level JSON value is not an object
    #[error("Top-level value is not a JSON object")]
    NotAnObject,

    /// The required top-level key is absent
    #[error("Missing 'checkboxes' key at the top level")]
    MissingCheckboxes,

    /// The checkboxes value has the wrong shape
    #[error("'checkboxes' is not an array")]
    CheckboxesNotArray,

    /// One record carries a missing or mistyped field
    #[error("Checkbox {index}: field '{field}' is missing or not a {expected}")]
    InvalidField {
        /// Zero-based position of the record in the array
        index: usize,
        /// Name of the offending field
        field: &'static str,
        /// Expected JSON type
        expected: &'static str,
    },

    /// Input was not valid JSON at all
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
