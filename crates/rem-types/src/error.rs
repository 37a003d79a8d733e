use thiserror::Error;

/// Errors produced when converting loose JSON into typed records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("record has no `id` field")]
    MissingId,

    #[error("`id` is not an integer: {0}")]
    NonIntegerId(String),

    #[error("invalid item id: {0}")]
    InvalidId(String),
}

/// Short name of a JSON value's kind, for error messages.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
