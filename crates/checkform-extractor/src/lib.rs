//! Checkform Extractor
//!
//! Converts scanned ACORD 25 form pages into structured checkbox records by
//! prompting a hosted vision-language model.
//!
//! # Architecture
//!
//! ```text
//! PDF/PNG → PdfRenderer → page PNG → VisionModel → raw text → parser → CheckboxRecords
//! ```
//!
//! # Key Features
//!
//! - **Prompt Assembly**: one seed instruction template plus additive
//!   refinement fragments from the optimizer
//! - **PDF Rendering**: pdfium-backed page rasterization at configurable DPI
//! - **Response Scraping**: locates the JSON object inside free-form model
//!   text and validates it field by field
//! - **Timeout Handling**: each model call is one atomic step; a round
//!   either fully completes or fully fails
//! - **Batch Processing**: independent forms fan out on a bounded worker
//!   pool, attributed by source id
//!
//! # Example Usage
//!
//! ```no_run
//! use checkform_extractor::{CheckboxExtractor, ExtractorConfig, PromptBuilder};
//! use checkform_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"checkboxes": []}"#);
//! let extractor = CheckboxExtractor::new(provider, ExtractorConfig::default());
//!
//! let prompt = PromptBuilder::new().build();
//! let result = extractor.extract_image(&[], "form_001", &prompt).await?;
//!
//! println!("{} checkboxes from {}", result.records.len(), result.source_id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod render;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::CheckboxExtractor;
pub use prompt::{PromptBuilder, SEED_PROMPT};
pub use render::{PageImage, PdfRenderer};
pub use types::{BatchFailure, BatchOutcome, ExtractionMetadata, ExtractionResult};
