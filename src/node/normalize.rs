//! One error shape out of many.
//!
//! Failures reach the node as loosely structured JSON: transport errors,
//! HTTP errors with a parsed body, or application errors nested in a cause.
//! Status and message are probed from a fixed, ordered list of locations.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::constants::errors::{banner, UNKNOWN_MESSAGE, UNKNOWN_STATUS};
use crate::node::assembler::{display_string, is_truthy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    Code(i64),
    Unknown,
}

impl ErrorStatus {
    pub fn code(self) -> Option<i64> {
        match self {
            ErrorStatus::Code(code) => Some(code),
            ErrorStatus::Unknown => None,
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStatus::Code(code) => write!(f, "{}", code),
            ErrorStatus::Unknown => write!(f, "{}", UNKNOWN_STATUS),
        }
    }
}

impl Serialize for ErrorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorStatus::Code(code) => serializer.serialize_i64(*code),
            ErrorStatus::Unknown => serializer.serialize_str(UNKNOWN_STATUS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub status: ErrorStatus,
    pub message: String,
    pub raw_body: Option<Value>,
    #[serde(skip)]
    pub raw_cause: Value,
}

impl NormalizedError {
    pub fn banner(&self) -> String {
        banner(&self.status.to_string())
    }

    pub fn http_code(&self) -> Option<String> {
        self.status.code().map(|code| code.to_string())
    }
}

/// Where a status code may live, in priority order.
const STATUS_PATHS: &[&[&str]] = &[
    &["response", "statusCode"],
    &["response", "status"],
    &["httpCode"],
    &["statusCode"],
    &["status"],
    &["cause", "response", "statusCode"],
    &["cause", "statusCode"],
];

const BODY_PATHS: &[&[&str]] = &[&["response", "body"], &["response", "data"]];

/// Fields of an error body that may carry the human-readable message.
const BODY_MESSAGE_FIELDS: &[&str] = &["error", "exception", "message", "error_message", "detail"];

fn probe<'a>(caught: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = caught;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// First location holding a defined (non-null) value.
fn first_defined<'a>(caught: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths
        .iter()
        .find_map(|path| probe(caught, path).filter(|value| !value.is_null()))
}

/// First location holding a truthy value.
fn first_truthy<'a>(caught: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths
        .iter()
        .find_map(|path| probe(caught, path).filter(|value| is_truthy(value)))
}

fn extract_status(caught: &Value) -> ErrorStatus {
    match first_defined(caught, STATUS_PATHS) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.trunc() as i64))
            .map(ErrorStatus::Code)
            .unwrap_or(ErrorStatus::Unknown),
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed != 0.0 => {
                ErrorStatus::Code(parsed.trunc() as i64)
            }
            _ => ErrorStatus::Unknown,
        },
        _ => ErrorStatus::Unknown,
    }
}

fn extract_body(caught: &Value) -> Option<&Value> {
    first_truthy(caught, BODY_PATHS)
}

fn extract_message(caught: &Value, body: Option<&Value>) -> String {
    if let Some(body) = body {
        let from_body = BODY_MESSAGE_FIELDS
            .iter()
            .find_map(|field| body.get(*field).filter(|value| is_truthy(value)));
        if let Some(found) = from_body
            .or_else(|| probe(caught, &["response", "statusMessage"]).filter(|v| is_truthy(v)))
        {
            return display_string(found);
        }
    }
    probe(caught, &["message"])
        .filter(|value| is_truthy(value))
        .map(display_string)
        .unwrap_or_else(|| UNKNOWN_MESSAGE.to_string())
}

pub fn normalize(caught: &Value) -> NormalizedError {
    let body = extract_body(caught);
    NormalizedError {
        status: extract_status(caught),
        message: extract_message(caught, body),
        raw_body: body.cloned(),
        raw_cause: caught.clone(),
    }
}
