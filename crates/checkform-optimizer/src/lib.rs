//! Checkform Prompt Optimizer
//!
//! Drives the extraction prompt toward fixed precision/recall targets by
//! iterating rounds of extract → match → score → refine.
//!
//! ## Round Loop
//!
//! ```text
//! seed prompt → Extractor → Matcher → Scorer → refinement fragments → next round
//! ```
//!
//! Each round's prompt depends on the previous round's error analysis, so
//! rounds execute strictly one-after-another; there is no parallelism in
//! this loop.
//!
//! ## Policies
//!
//! - **Acceptance**: a round becomes the best-so-far when it
//!   Pareto-dominates on (precision, recall) or strictly improves F1
//! - **Refinement**: additive prompt fragments enumerating the round's
//!   missed, spurious, and state-disputed checkboxes; the seed prompt is
//!   never rewritten
//! - **Stopping**: target met, round budget exhausted, or a terminal
//!   extractor failure; the best observed result is always returned

#![warn(missing_docs)]

mod config;
mod optimizer;
mod refine;
mod state;

pub use config::OptimizerConfig;
pub use optimizer::PromptOptimizer;
pub use refine::refinement_fragments;
pub use state::{OptimizationResult, RoundRecord, TerminalState};
