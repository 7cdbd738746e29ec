//! Checkform Vision Provider Layer
//!
//! Pluggable vision-language model implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `VisionModel` trait from
//! `checkform-domain`. It supports multiple backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `GeminiProvider`: Hosted Gemini `generateContent` API integration
//!
//! # Examples
//!
//! ```
//! use checkform_llm::MockProvider;
//! use checkform_domain::VisionModel;
//!
//! let provider = MockProvider::new(r#"{"checkboxes": []}"#);
//! let result = provider.generate("test prompt", &[]).unwrap();
//! assert_eq!(result, r#"{"checkboxes": []}"#);
//! ```

#![warn(missing_docs)]

pub mod gemini;

use checkform_domain::{ProviderFailure, VisionModel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during vision model operations
#[derive(Error, Debug)]
pub enum VisionError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit or quota exceeded")]
    RateLimited,

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Vision model error: {0}")]
    Other(String),
}

impl ProviderFailure for VisionError {
    fn is_transient(&self) -> bool {
        matches!(self, VisionError::RateLimited | VisionError::Timeout)
    }
}

/// One scripted reply for the mock provider
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the model response
    Text(String),
    /// Fail with a transient rate-limit error
    RateLimited,
    /// Fail with a non-transient error
    Fail(String),
}

/// Mock vision provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Replies can be scripted in sequence, which is how optimizer round
/// loops are exercised in tests.
///
/// # Examples
///
/// ```
/// use checkform_llm::{MockProvider, MockReply};
/// use checkform_domain::VisionModel;
///
/// let provider = MockProvider::new("default");
/// provider.push_text("round one");
/// provider.push(MockReply::RateLimited);
///
/// assert_eq!(provider.generate("p", &[]).unwrap(), "round one");
/// assert!(provider.generate("p", &[]).is_err());
/// // Script exhausted: fall back to the default response
/// assert_eq!(provider.generate("p", &[]).unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a scripted reply; scripted replies are consumed in order
    /// before the default response is used
    pub fn push(&self, reply: MockReply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// Queue a successful text reply
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockReply::Text(text.into()));
    }

    /// Queue a non-transient failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(MockReply::Fail(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl VisionModel for MockProvider {
    type Error = VisionError;

    fn generate(&self, _prompt: &str, _image_png: &[u8]) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::RateLimited) => Err(VisionError::RateLimited),
            Some(MockReply::Fail(message)) => Err(VisionError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", &[]);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_script_order() {
        let provider = MockProvider::default();
        provider.push_text("first");
        provider.push_text("second");

        assert_eq!(provider.generate("p", &[]).unwrap(), "first");
        assert_eq!(provider.generate("p", &[]).unwrap(), "second");
        assert_eq!(provider.generate("p", &[]).unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1", &[]).unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("prompt2", &[]).unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_rate_limited_is_transient() {
        let provider = MockProvider::default();
        provider.push(MockReply::RateLimited);

        let err = provider.generate("p", &[]).unwrap_err();
        assert!(matches!(err, VisionError::RateLimited));
        assert!(err.is_transient());
    }

    #[test]
    fn test_mock_provider_failure_is_terminal() {
        let provider = MockProvider::default();
        provider.push_failure("boom");

        let err = provider.generate("p", &[]).unwrap_err();
        assert!(matches!(err, VisionError::Other(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test", &[]).unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
