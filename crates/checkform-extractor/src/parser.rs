//! Parse raw model output into checkbox records
//!
//! The model is instructed to return bare JSON but in practice wraps it in
//! markdown fences or commentary. Scraping locates the outermost JSON
//! object; field validation is strict - a record with a missing or mistyped
//! field fails the whole response as a parse error, which the optimizer
//! scores as an empty prediction set.

use crate::error::ExtractorError;
use checkform_domain::CheckboxRecord;
use serde_json::Value;

/// Parse a raw model response into checkbox records
pub fn parse_response(response: &str) -> Result<Vec<CheckboxRecord>, ExtractorError> {
    let json_str = scrape_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::Parse(format!("JSON parse error: {}", e)))?;

    let object = json
        .as_object()
        .ok_or_else(|| ExtractorError::Parse("Expected a JSON object".to_string()))?;

    let checkboxes = object
        .get("checkboxes")
        .ok_or_else(|| ExtractorError::Parse("Missing 'checkboxes' key".to_string()))?
        .as_array()
        .ok_or_else(|| ExtractorError::Parse("'checkboxes' is not an array".to_string()))?;

    checkboxes
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_checkbox(index, entry))
        .collect()
}

/// Locate the JSON object inside free-form model text.
///
/// Strips a markdown code fence if present, then takes the span from the
/// first `{` to the last `}`.
fn scrape_json(response: &str) -> Result<String, ExtractorError> {
    let mut text = response.trim();

    if text.starts_with("```") {
        if let Some(newline) = text.find('\n') {
            let body = &text[newline + 1..];
            text = match body.rfind("```") {
                Some(end) => body[..end].trim(),
                None => body.trim(),
            };
        }
    }

    let start = text
        .find('{')
        .ok_or_else(|| ExtractorError::Parse("No JSON object found in response".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| ExtractorError::Parse("No JSON object found in response".to_string()))?;
    if end < start {
        return Err(ExtractorError::Parse(
            "No JSON object found in response".to_string(),
        ));
    }

    Ok(text[start..=end].to_string())
}

fn parse_checkbox(index: usize, entry: &Value) -> Result<CheckboxRecord, ExtractorError> {
    let object = entry.as_object().ok_or_else(|| {
        ExtractorError::Parse(format!("Checkbox {}: not a JSON object", index))
    })?;

    let section = object
        .get("section")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ExtractorError::Parse(format!(
                "Checkbox {}: field 'section' missing or not a string",
                index
            ))
        })?;

    let label = object.get("label").and_then(Value::as_str).ok_or_else(|| {
        ExtractorError::Parse(format!(
            "Checkbox {}: field 'label' missing or not a string",
            index
        ))
    })?;

    let is_checked = object
        .get("is_checked")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            ExtractorError::Parse(format!(
                "Checkbox {}: field 'is_checked' missing or not a boolean",
                index
            ))
        })?;

    Ok(CheckboxRecord::new(section, label, is_checked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json() {
        let response = r#"{
            "checkboxes": [
                {"section": "TYPE OF INSURANCE", "label": "OCCUR", "is_checked": true}
            ]
        }"#;

        let records = parse_response(response).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section, "TYPE OF INSURANCE");
        assert_eq!(records[0].label, "OCCUR");
        assert!(records[0].is_checked);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"checkboxes\": [{\"section\": \"A\", \"label\": \"B\", \"is_checked\": false}]}\n```";

        let records = parse_response(response).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_checked);
    }

    #[test]
    fn test_parse_json_with_commentary() {
        let response = r#"Here is the extraction you asked for:
{"checkboxes": [{"section": "A", "label": "B", "is_checked": true}]}
Let me know if you need anything else."#;

        let records = parse_response(response).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_empty_checkbox_list() {
        let records = parse_response(r#"{"checkboxes": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_no_json_at_all() {
        let result = parse_response("I could not read this form.");
        assert!(matches!(result, Err(ExtractorError::Parse(_))));
    }

    #[test]
    fn test_parse_missing_checkboxes_key() {
        let result = parse_response(r#"{"boxes": []}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("checkboxes"));
    }

    #[test]
    fn test_parse_rejects_mistyped_state() {
        let response = r#"{"checkboxes": [
            {"section": "A", "label": "B", "is_checked": "true"}
        ]}"#;

        let err = parse_response(response).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("is_checked"));
    }

    #[test]
    fn test_parse_rejects_missing_label() {
        let response = r#"{"checkboxes": [
            {"section": "A", "is_checked": true}
        ]}"#;

        let err = parse_response(response).unwrap_err();
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_scrape_handles_unclosed_fence() {
        let response = "```json\n{\"checkboxes\": []}";
        let records = parse_response(response).unwrap();
        assert!(records.is_empty());
    }
}
