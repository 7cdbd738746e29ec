//! Gemini Provider Implementation
//!
//! Provides integration with the hosted Gemini `generateContent` API for
//! vision-language extraction over scanned form images.
//!
//! # Features
//!
//! - Async HTTP communication with the Generative Language API
//! - Inline base64 PNG image payloads
//! - Configurable endpoint, model, and credential (never hardcoded)
//! - Retry logic with exponential backoff
//! - Rate-limit and quota classification for the optimizer's retry policy
//!
//! # Examples
//!
//! ```no_run
//! use checkform_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("gemini-2.0-flash", "api-key-from-config");
//!
//! // Note: the generate method is async, so you need to use it in an async
//! // context or use the VisionModel trait's sync wrapper
//! ```

use crate::VisionError;
use base64::Engine;
use checkform_domain::VisionModel as VisionModelTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default timeout for model requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Sampling temperature; pinned low for reproducible extraction
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Gemini API provider for hosted vision inference
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the generateContent API
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

/// Response from the generateContent API
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `model`: Model to use (e.g., "gemini-2.0-flash")
    /// - `api_key`: API credential, supplied by configuration
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the API endpoint (for proxies or regional hosts)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate a text response for a prompt over a PNG page image
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API rejects the credential or model name
    /// - The rate limit or quota is exhausted after retries
    /// - Network communication fails
    /// - The response carries no text candidates
    pub async fn generate(&self, prompt: &str, image_png: &[u8]) -> Result<String, VisionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_png);

        let request_body = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Image {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: image_b64,
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.json::<GenerateResponse>().await {
                            Ok(body) => return extract_text(body),
                            Err(e) => {
                                return Err(VisionError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(VisionError::RateLimited);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(VisionError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        if is_quota_message(&error_text) {
                            last_error = Some(VisionError::RateLimited);
                        } else {
                            last_error = Some(VisionError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(VisionError::Timeout);
                }
                Err(e) => {
                    last_error = Some(VisionError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| VisionError::Communication("Max retries exceeded".to_string())))
    }
}

/// Pull the concatenated candidate text out of a response body
fn extract_text(body: GenerateResponse) -> Result<String, VisionError> {
    let text: String = body
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(VisionError::InvalidResponse(
            "Response carried no text candidates".to_string(),
        ));
    }

    Ok(text)
}

/// The API sometimes reports quota exhaustion with HTTP 400/403 bodies
fn is_quota_message(body: &str) -> bool {
    let lowered = body.to_lowercase();
    lowered.contains("quota") || lowered.contains("resource_exhausted") || lowered.contains("429")
}

impl VisionModelTrait for GeminiProvider {
    type Error = VisionError;

    fn generate(&self, prompt: &str, image_png: &[u8]) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; the extractor invokes this
        // from spawn_blocking
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.generate(prompt, image_png).await })
    }
}
