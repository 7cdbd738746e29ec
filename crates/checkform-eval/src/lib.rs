//! Checkform Evaluation Engine
//!
//! Reconciles two differently-worded, differently-ordered, possibly
//! incomplete sets of checkbox records (model output vs. human-labeled
//! ground truth) into a confusion-matrix count and the standard retrieval
//! metrics.
//!
//! ## Pipeline
//!
//! ```text
//! predictions + ground truth → Matcher → MatchOutcome → Scorer → MetricsReport
//! ```
//!
//! ## Metrics
//!
//! - **Precision**: `tp / (tp + fp)` - how many reported checkboxes were right
//! - **Recall**: `tp / (tp + fn)` - how many labeled checkboxes were found
//! - **F1 Score**: harmonic mean of precision and recall
//!
//! All three are defined as 0 when their denominator is 0; an empty
//! prediction set against an empty ground truth scores 0 across the board,
//! never 1.
//!
//! Matching is identity-based: records pair on their normalized
//! (section, label) key, exactly first, then by a mutual-best similarity
//! fallback for transcription variance. The checked state is compared only
//! after a pair is formed; a state disagreement counts as one false positive
//! and one false negative.

#![warn(missing_docs)]

mod error;
mod loader;
mod matcher;
mod scorer;

pub use error::EvalError;
pub use loader::{load_records, parse_records, records_to_json, write_records};
pub use matcher::{
    match_records, match_records_with_threshold, MatchOutcome, MatchedPair,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use scorer::{score, MetricsReport};
