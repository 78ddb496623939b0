// The backend answers in several shapes: a bare array, `{success, data}`,
// `{data}`, or a bare object. Every response body passes through
// `normalize` so the rest of the crate sees one shape.
use crate::error::ClientError;
use serde_json::Value;
use shared::models::Row;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub rows: Vec<Row>,
    /// Informational `message` the backend attached, if any.
    pub message: Option<String>,
}

impl Envelope {
    /// The single row of an item response (get / create / update).
    pub fn into_single(self) -> Option<Row> {
        self.rows.into_iter().next()
    }
}

pub fn normalize(body: Value) -> Result<Envelope, ClientError> {
    match body {
        Value::Null => Ok(Envelope::default()),
        Value::Array(items) => Ok(Envelope {
            rows: rows_from(items)?,
            message: None,
        }),
        Value::Object(mut map) => {
            let message = text_of(map.get("message"));
            let rejected = matches!(map.get("success"), Some(Value::Bool(false)));
            if rejected {
                return Err(ClientError::Rejected {
                    message: error_message(&Value::Object(map)),
                });
            }
            let rows = match map.remove("data") {
                Some(Value::Array(items)) => rows_from(items)?,
                Some(Value::Object(row)) => vec![row],
                Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(ClientError::DecodeError(format!(
                        "expected 'data' to be a list or an object, got {}",
                        kind(&other)
                    )))
                }
                // A flat `{success, message, ...fields}` answer carries its
                // row inline; a bare acknowledgement has none.
                None if map.contains_key("success") => {
                    map.remove("success");
                    map.remove("message");
                    if map.is_empty() {
                        Vec::new()
                    } else {
                        vec![map]
                    }
                }
                None => vec![map],
            };
            Ok(Envelope { rows, message })
        }
        other => Err(ClientError::DecodeError(format!(
            "expected a list or an object, got {}",
            kind(&other)
        ))),
    }
}

/// Best-effort user-facing text from an error body: `message`, then `error`.
pub fn error_message(body: &Value) -> Option<String> {
    text_field(body, "message")
        .or_else(|| text_field(body, "error"))
        .or_else(|| body.get("error").and_then(|e| text_field(e, "message")))
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    text_of(body.get(key))
}

fn text_of(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn rows_from(items: Vec<Value>) -> Result<Vec<Row>, ClientError> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(ClientError::DecodeError(format!(
                "list element {} is {}, expected an object",
                idx,
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
