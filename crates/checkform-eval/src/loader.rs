//! JSON boundary for prediction and ground-truth files
//!
//! Both file kinds share one shape: a top-level `"checkboxes"` key mapping
//! to an array of `{section, label, is_checked}` objects. Reading is strict;
//! a missing key or a mistyped field is rejected with the field named,
//! never coerced.

use crate::error::EvalError;
use checkform_domain::CheckboxRecord;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a checkbox file body into records
pub fn parse_records(json_text: &str) -> Result<Vec<CheckboxRecord>, EvalError> {
    let value: Value = serde_json::from_str(json_text)?;
    let object = value.as_object().ok_or(EvalError::NotAnObject)?;
    let checkboxes = object
        .get("checkboxes")
        .ok_or(EvalError::MissingCheckboxes)?;
    let array = checkboxes.as_array().ok_or(EvalError::CheckboxesNotArray)?;

    let records = array
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = records.len(), "parsed checkbox records");
    Ok(records)
}

/// Load records from a file on disk
pub fn load_records(path: &Path) -> Result<Vec<CheckboxRecord>, EvalError> {
    let contents = fs::read_to_string(path)?;
    parse_records(&contents)
}

/// Serialize records into the canonical file shape
pub fn records_to_json(records: &[CheckboxRecord]) -> Result<String, EvalError> {
    let entries: Vec<Value> = records
        .iter()
        .map(|r| {
            json!({
                "section": r.section,
                "label": r.label,
                "is_checked": r.is_checked,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json!({ "checkboxes": entries }))?)
}

/// Write records to a file on disk in the canonical shape
pub fn write_records(path: &Path, records: &[CheckboxRecord]) -> Result<(), EvalError> {
    fs::write(path, records_to_json(records)?)?;
    Ok(())
}

fn parse_record(index: usize, entry: &Value) -> Result<CheckboxRecord, EvalError> {
    let object = entry.as_object().ok_or(EvalError::InvalidField {
        index,
        field: "checkbox",
        expected: "object",
    })?;

    let section = object
        .get("section")
        .and_then(Value::as_str)
        .ok_or(EvalError::InvalidField {
            index,
            field: "section",
            expected: "string",
        })?;

    let label = object
        .get("label")
        .and_then(Value::as_str)
        .ok_or(EvalError::InvalidField {
            index,
            field: "label",
            expected: "string",
        })?;

    let is_checked = object
        .get("is_checked")
        .and_then(Value::as_bool)
        .ok_or(EvalError::InvalidField {
            index,
            field: "is_checked",
            expected: "boolean",
        })?;

    Ok(CheckboxRecord::new(section, label, is_checked))
}
