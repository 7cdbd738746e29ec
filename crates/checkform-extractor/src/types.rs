//! Request and response types for extraction

use checkform_domain::CheckboxRecord;

/// Result of extracting one form (all of its pages)
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Identifier of the input this result belongs to; batch results are
    /// attributed by this, never by arrival order
    pub source_id: String,

    /// Extracted records in page order
    pub records: Vec<CheckboxRecord>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Name of the vision model used
    pub model_name: String,

    /// Timestamp when extraction occurred (seconds since Unix epoch)
    pub timestamp: u64,

    /// Number of page images sent to the model
    pub pages: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// One input that failed during batch extraction
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Identifier of the failed input
    pub source_id: String,

    /// Failure description
    pub reason: String,
}

/// Outcome of a batch run over independent inputs
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successful extractions
    pub results: Vec<ExtractionResult>,

    /// Inputs that failed; a failure of one input never aborts the others
    pub failures: Vec<BatchFailure>,
}
