//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::render::{PageImage, PdfRenderer};
use crate::types::{BatchFailure, BatchOutcome, ExtractionMetadata, ExtractionResult};
use checkform_domain::{ProviderFailure, VisionModel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor converts scanned form pages into checkbox records
pub struct CheckboxExtractor<V>
where
    V: VisionModel,
{
    provider: Arc<V>,
    config: ExtractorConfig,
    model_name: String,
}

impl<V: VisionModel> Clone for CheckboxExtractor<V> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: self.config.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

impl<V> CheckboxExtractor<V>
where
    V: VisionModel + Send + Sync + 'static,
    V::Error: std::fmt::Display + ProviderFailure,
{
    /// Create a new Extractor
    pub fn new(provider: V, config: ExtractorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            model_name: "vision-model".to_string(),
        }
    }

    /// Create a new Extractor with a specific model name for metadata
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract checkbox records from one PNG page image.
    ///
    /// The model call is a single atomic step under the configured timeout;
    /// it either fully completes or fully fails.
    pub async fn extract_image(
        &self,
        image_png: &[u8],
        source_id: &str,
        prompt: &str,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start_time = SystemTime::now();

        info!(
            "Starting extraction for source '{}', image {} bytes",
            source_id,
            image_png.len()
        );
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(
            self.config.request_timeout(),
            self.call_model(prompt, image_png.to_vec()),
        )
        .await
        .map_err(|_| ExtractorError::Timeout)??;

        debug!("Model response length: {} chars", response.len());

        let records = parse_response(&response)?;

        info!("Parsed {} checkbox records", records.len());

        let processing_time_ms = start_time
            .elapsed()
            .unwrap_or(Duration::from_secs(0))
            .as_millis() as u64;

        Ok(ExtractionResult {
            source_id: source_id.to_string(),
            records,
            metadata: self.metadata(1, processing_time_ms),
        })
    }

    /// Extract checkbox records from one form file (PDF or image).
    ///
    /// PDF pages are rasterized at the configured DPI and processed in
    /// order; records from every page are merged under one source id.
    pub async fn extract_form(
        &self,
        path: &Path,
        prompt: &str,
    ) -> Result<ExtractionResult, ExtractorError> {
        let source_id = source_id_for(path);
        let pages = self.prepare_pages(path)?;
        self.extract_pages(&source_id, pages, prompt).await
    }

    /// Process independent form files on a bounded worker pool.
    ///
    /// One input's failure never aborts the others; every result and
    /// failure is attributed by source id, never by arrival order.
    pub async fn batch(&self, inputs: &[PathBuf], prompt: &str) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        // Rasterize up front on this task; pdfium is not thread-safe.
        // Only the model calls fan out.
        let mut prepared = Vec::new();
        for path in inputs {
            let source_id = source_id_for(path);
            match self.prepare_pages(path) {
                Ok(pages) => prepared.push((source_id, pages)),
                Err(e) => {
                    warn!("Failed to prepare '{}': {}", source_id, e);
                    outcome.failures.push(BatchFailure {
                        source_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set = JoinSet::new();

        for (source_id, pages) in prepared {
            let extractor = self.clone();
            let prompt = prompt.to_string();
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = extractor.extract_pages(&source_id, pages, &prompt).await;
                (source_id, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(result))) => outcome.results.push(result),
                Ok((source_id, Err(e))) => {
                    warn!("Extraction failed for '{}': {}", source_id, e);
                    outcome.failures.push(BatchFailure {
                        source_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => outcome.failures.push(BatchFailure {
                    source_id: "unknown".to_string(),
                    reason: format!("Task join error: {}", e),
                }),
            }
        }

        // Arrival order is scheduling noise; report in input-name order.
        outcome.results.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        outcome.failures.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        info!(
            "Batch complete: {} extracted, {} failed",
            outcome.results.len(),
            outcome.failures.len()
        );

        outcome
    }

    /// Rasterize an input file into page images
    fn prepare_pages(&self, path: &Path) -> Result<Vec<PageImage>, ExtractorError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => {
                let renderer = PdfRenderer::new()?;
                renderer.render_pages(path, self.config.dpi, self.config.max_pages)
            }
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" => {
                Ok(vec![PageImage::from_png(std::fs::read(path)?)])
            }
            _ => Err(ExtractorError::UnsupportedInput(
                path.display().to_string(),
            )),
        }
    }

    /// Extract every page of one form sequentially and merge the records
    async fn extract_pages(
        &self,
        source_id: &str,
        pages: Vec<PageImage>,
        prompt: &str,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start_time = SystemTime::now();
        let page_count = pages.len();
        let mut records = Vec::new();

        for page in pages {
            debug!("Processing page {}/{}", page.page_number, page_count);
            let page_id = format!("{}:page:{}", source_id, page.page_number);
            let page_result = self
                .extract_image(&page.png_data, &page_id, prompt)
                .await?;
            records.extend(page_result.records);
        }

        let processing_time_ms = start_time
            .elapsed()
            .unwrap_or(Duration::from_secs(0))
            .as_millis() as u64;

        Ok(ExtractionResult {
            source_id: source_id.to_string(),
            records,
            metadata: self.metadata(page_count, processing_time_ms),
        })
    }

    /// Call the vision provider
    async fn call_model(&self, prompt: &str, image_png: Vec<u8>) -> Result<String, ExtractorError> {
        let provider = Arc::clone(&self.provider);
        let prompt = prompt.to_string();

        // Call in a blocking context since VisionModel is not async
        tokio::task::spawn_blocking(move || {
            provider
                .generate(&prompt, &image_png)
                .map_err(|e| ExtractorError::Vision {
                    transient: e.is_transient(),
                    message: e.to_string(),
                })
        })
        .await
        .map_err(|e| ExtractorError::Vision {
            message: format!("Task join error: {}", e),
            transient: false,
        })?
    }

    fn metadata(&self, pages: usize, processing_time_ms: u64) -> ExtractionMetadata {
        ExtractionMetadata {
            model_name: self.model_name.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::from_secs(0))
                .as_secs(),
            pages,
            processing_time_ms,
        }
    }
}

/// Attribution identifier for an input path
fn source_id_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
