//! Document source: turn a fetched regulation export into a `Capture`.
//!
//! Two JSON layouts are accepted.
//!
//! Scraper export:
//! ```json
//! {
//!   "version_info": { "fac_number": "2025-05", "effective_date": "2025-10-01" },
//!   "parts": { "part_1": { "content": "..." }, "part_2": "..." }
//! }
//! ```
//!
//! Plain document:
//! ```json
//! { "version_label": "2025-05", "effective_date": "2025-10-01", "sections": { "1.101": "..." } }
//! ```
//!
//! Section content always goes through `SectionMap` validation.

#![allow(clippy::result_large_err)]

use regwatch_core::errors::{ExError, ExErrorKind, Result};
use regwatch_core::{Capture, SectionMap};
use serde_json::{Map, Value};
use std::path::Path;

/// Read and parse a document file.
///
/// # Errors
///
/// - `Io` if the file cannot be read
/// - `Serialization` if it is not JSON
/// - `InvalidInput` for an unrecognised layout
/// - `InvalidSectionMap` for malformed sections
pub fn load_document(path: &Path, document_id: &str) -> Result<Capture> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("load_document")
            .with_entity_id(path.display().to_string())
            .with_message(e.to_string())
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ExError::from(e).with_entity_id(path.display().to_string()))?;
    parse_document(&value, document_id)
}

/// Parse an already decoded document.
///
/// # Errors
///
/// As [`load_document`], minus `Io`.
pub fn parse_document(value: &Value, document_id: &str) -> Result<Capture> {
    let root = value.as_object().ok_or_else(|| unrecognised("root is not an object"))?;

    let capture = if let Some(parts) = root.get("parts") {
        let info = root.get("version_info").and_then(Value::as_object);
        Capture::new(
            document_id,
            text_field(info, "fac_number"),
            text_field(info, "effective_date"),
            sections_from_parts(parts)?,
        )
    } else if let Some(sections) = root.get("sections") {
        Capture::new(
            document_id,
            text_field(Some(root), "version_label"),
            text_field(Some(root), "effective_date"),
            SectionMap::from_json_value(sections)?,
        )
    } else {
        return Err(unrecognised("expected a \"parts\" or \"sections\" object"));
    };

    capture.validate()?;
    tracing::debug!(
        document_id = %capture.document_id,
        version_label = %capture.version_label,
        section_count = capture.sections.len(),
        "Loaded document"
    );
    Ok(capture)
}

/// Flatten scraper parts: `{id: {"content": text}}` or `{id: text}`.
/// A part object without `content` is an empty section.
fn sections_from_parts(parts: &Value) -> Result<SectionMap> {
    let Some(parts) = parts.as_object() else {
        return Ok(SectionMap::from_json_value(parts)?);
    };
    let flattened: Map<String, Value> = parts
        .iter()
        .map(|(id, part)| {
            let content = match part {
                Value::Object(fields) => fields
                    .get("content")
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new())),
                other => other.clone(),
            };
            (id.clone(), content)
        })
        .collect();
    Ok(SectionMap::from_json_value(&Value::Object(flattened))?)
}

/// String field, empty when missing or not a string
fn text_field(object: Option<&Map<String, Value>>, key: &str) -> String {
    object
        .and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn unrecognised(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_document")
        .with_message(format!("Unrecognised document layout: {}", reason))
}
