//! Extractor-level tests against the mock provider

use crate::{CheckboxExtractor, ExtractorConfig, PromptBuilder};
use checkform_llm::{MockProvider, MockReply};
use std::fs;

fn extractor_with(provider: MockProvider) -> CheckboxExtractor<MockProvider> {
    CheckboxExtractor::new(provider, ExtractorConfig::default()).with_model_name("mock")
}

#[tokio::test]
async fn test_extract_image_parses_records() {
    let provider = MockProvider::new(
        r#"{"checkboxes": [
            {"section": "TYPE OF INSURANCE", "label": "OCCUR", "is_checked": true},
            {"section": "COVERAGES", "label": "CLAIMS-MADE", "is_checked": false}
        ]}"#,
    );
    let extractor = extractor_with(provider);

    let prompt = PromptBuilder::new().build();
    let result = extractor
        .extract_image(&[0u8; 16], "form_001", &prompt)
        .await
        .unwrap();

    assert_eq!(result.source_id, "form_001");
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.metadata.model_name, "mock");
    assert_eq!(result.metadata.pages, 1);
}

#[tokio::test]
async fn test_extract_image_handles_fenced_response() {
    let provider =
        MockProvider::new("```json\n{\"checkboxes\": [{\"section\": \"A\", \"label\": \"B\", \"is_checked\": true}]}\n```");
    let extractor = extractor_with(provider);

    let result = extractor
        .extract_image(&[], "form", "prompt")
        .await
        .unwrap();
    assert_eq!(result.records.len(), 1);
}

#[tokio::test]
async fn test_extract_image_parse_failure() {
    let provider = MockProvider::new("I could not find any checkboxes, sorry.");
    let extractor = extractor_with(provider);

    let err = extractor
        .extract_image(&[], "form", "prompt")
        .await
        .unwrap_err();
    assert!(err.is_parse());
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_extract_image_transient_failure() {
    let provider = MockProvider::default();
    provider.push(MockReply::RateLimited);
    let extractor = extractor_with(provider);

    let err = extractor
        .extract_image(&[], "form", "prompt")
        .await
        .unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_extract_image_terminal_failure() {
    let provider = MockProvider::default();
    provider.push_failure("model exploded");
    let extractor = extractor_with(provider);

    let err = extractor
        .extract_image(&[], "form", "prompt")
        .await
        .unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("model exploded"));
}

#[tokio::test]
async fn test_extract_form_rejects_unknown_extension() {
    let provider = MockProvider::default();
    let extractor = extractor_with(provider);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form.docx");
    fs::write(&path, b"not a form").unwrap();

    let err = extractor.extract_form(&path, "prompt").await.unwrap_err();
    assert!(matches!(err, crate::ExtractorError::UnsupportedInput(_)));
}

#[tokio::test]
async fn test_batch_attributes_results_by_source_id() {
    let provider = MockProvider::new(
        r#"{"checkboxes": [{"section": "A", "label": "B", "is_checked": true}]}"#,
    );
    let extractor = extractor_with(provider);

    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("alpha.png");
    let second = dir.path().join("beta.png");
    fs::write(&first, b"png-bytes").unwrap();
    fs::write(&second, b"png-bytes").unwrap();

    let outcome = extractor
        .batch(&[first, second], "prompt")
        .await;

    assert!(outcome.failures.is_empty());
    let ids: Vec<&str> = outcome.results.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(ids, vec!["alpha.png", "beta.png"]);
    assert!(outcome.results.iter().all(|r| r.records.len() == 1));
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let provider = MockProvider::new(
        r#"{"checkboxes": []}"#,
    );
    let extractor = extractor_with(provider);

    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    fs::write(&good, b"png-bytes").unwrap();
    let missing = dir.path().join("missing.png");

    let outcome = extractor.batch(&[good, missing], "prompt").await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].source_id, "good.png");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].source_id, "missing.png");
}
