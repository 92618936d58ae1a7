use serde_json::Value;

use crate::domain::{AttributeSpec, AttributeType};

/// Separator used when a model returns a list for a text-typed attribute.
/// The elements are joined rather than silently dropped.
pub const LIST_JOIN_SEPARATOR: &str = "; ";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("model output is not valid JSON: {message}")]
    InvalidJson { message: String, raw_text: String },
    #[error("model output is valid JSON but not an object")]
    NotAnObject { raw_text: String },
}

impl ParseError {
    pub fn raw_text(&self) -> &str {
        match self {
            ParseError::InvalidJson { raw_text, .. } => raw_text,
            ParseError::NotAnObject { raw_text } => raw_text,
        }
    }
}

/// Locate the JSON payload inside free-form model output: the first fenced
/// code block labeled `json` wins, else the outermost balanced-brace span,
/// else the text verbatim. The brace heuristic is fragile by nature; a
/// structured-output contract with the provider would supersede it.
pub fn extract_json_span(raw_text: &str) -> &str {
    if let Some(fenced) = fenced_json_block(raw_text) {
        return fenced;
    }
    if let Some(span) = outermost_brace_span(raw_text) {
        return span;
    }
    raw_text.trim()
}

fn fenced_json_block(raw_text: &str) -> Option<&str> {
    let start = raw_text.find("```json")? + "```json".len();
    let rest = &raw_text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// String-aware brace matching: braces inside JSON string literals do not
/// count toward nesting depth.
fn outermost_brace_span(raw_text: &str) -> Option<&str> {
    let open = raw_text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw_text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw_text[open..open + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse raw model output into the requested attribute set: missing
/// attributes become null, scalars for list attributes are wrapped,
/// lists for text attributes are joined, and unrequested keys are dropped.
/// A decode failure is permanent and keeps the raw text for diagnosis.
pub fn parse_attributes(
    raw_text: &str,
    attributes: &[AttributeSpec],
) -> Result<serde_json::Map<String, Value>, ParseError> {
    let span = extract_json_span(raw_text);

    let parsed: Value = serde_json::from_str(span).map_err(|e| ParseError::InvalidJson {
        message: e.to_string(),
        raw_text: raw_text.to_string(),
    })?;

    let object = match parsed {
        Value::Object(map) => map,
        _ => {
            return Err(ParseError::NotAnObject {
                raw_text: raw_text.to_string(),
            });
        }
    };

    Ok(normalize_object(object, attributes))
}

/// Project a parsed object onto the requested attribute set: keys come out
/// in request order, missing attributes become null, values are coerced to
/// the declared type, and unrequested keys are dropped. Also applied to
/// automation-pipeline output so every path honors the same result contract.
pub fn normalize_object(
    mut object: serde_json::Map<String, Value>,
    attributes: &[AttributeSpec],
) -> serde_json::Map<String, Value> {
    let mut normalized = serde_json::Map::with_capacity(attributes.len());
    for attribute in attributes {
        let value = object.remove(&attribute.name).unwrap_or(Value::Null);
        normalized.insert(
            attribute.name.clone(),
            normalize_value(value, attribute.value_type),
        );
    }

    if !object.is_empty() {
        tracing::debug!(
            dropped_keys = ?object.keys().collect::<Vec<_>>(),
            "Dropped keys not present in the requested attribute set"
        );
    }

    normalized
}

fn normalize_value(value: Value, value_type: AttributeType) -> Value {
    match (value_type, value) {
        (_, Value::Null) => Value::Null,
        (AttributeType::List, Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| Value::String(to_plain_string(item)))
                .collect(),
        ),
        (AttributeType::List, scalar) => Value::Array(vec![Value::String(to_plain_string(scalar))]),
        (AttributeType::Text, Value::Array(items)) => Value::String(
            items
                .into_iter()
                .map(to_plain_string)
                .collect::<Vec<_>>()
                .join(LIST_JOIN_SEPARATOR),
        ),
        // Nested objects are outside the result contract; keep the data as
        // a JSON string rather than dropping it.
        (AttributeType::Text, Value::Object(map)) => Value::String(Value::Object(map).to_string()),
        (AttributeType::Text, scalar) => scalar,
    }
}

fn to_plain_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
