//! Payload entry point for the response parsers.
//!
//! Model replies arrive either as raw text or as an already-decoded
//! JSON value. `RawPayload` captures that duality in one place; both
//! parsers normalize it to a keyed object before any field rule runs.

use serde_json::{Map, Value};

use crate::error::ParseError;

/// A payload as received from the generative API.
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// Raw reply text, expected to contain a JSON object
    Text(String),
    /// An already-decoded JSON value
    Json(Value),
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        RawPayload::Text(text)
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        RawPayload::Text(text.to_string())
    }
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        RawPayload::Json(value)
    }
}

impl RawPayload {
    /// Decode into a JSON object, the shape both parsers require.
    pub(crate) fn into_object(self) -> Result<Map<String, Value>, ParseError> {
        let (value, raw) = match self {
            RawPayload::Text(text) => {
                let candidate = extract_json(&text);
                let value: Value =
                    serde_json::from_str(candidate).map_err(|e| ParseError::InvalidJson {
                        reason: e.to_string(),
                        payload: text.clone(),
                    })?;
                (value, text)
            }
            RawPayload::Json(value) => {
                let raw = value.to_string();
                (value, raw)
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ParseError::NotAnObject {
                found: json_type_name(&other),
                payload: raw,
            }),
        }
    }
}

/// JSON type name for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the JSON object from reply text (handles markdown code blocks).
fn extract_json(text: &str) -> &str {
    // Check for markdown code block
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim();
        }
    }

    // Check for plain code block
    if let Some(start) = text.find("```") {
        if let Some(end) = text[start + 3..].find("```") {
            return text[start + 3..start + 3 + end].trim();
        }
    }

    // Find first { and last }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }

    text.trim()
}
