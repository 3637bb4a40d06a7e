use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::node::normalize::NormalizedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeErrorKind {
    InvalidParams,
    UnknownOperation,
    RemoteRequest,
    Internal,
}

/// Error surfaced to the host for a whole batch.
///
/// `message` is the short banner a host shows first, `description` the
/// one-line detail underneath it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeError {
    pub kind: NodeErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl NodeError {
    pub fn new(kind: NodeErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            description: None,
            hint: None,
            details: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn unknown_operation(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::UnknownOperation, "UNKNOWN_OPERATION", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::Internal, "INTERNAL", message)
    }

    /// Terminal failure raised in hard-fail mode.
    pub fn remote_request(error: &NormalizedError, item_index: usize) -> Self {
        Self::new(NodeErrorKind::RemoteRequest, "REMOTE_REQUEST", error.banner())
            .with_description(error.message.clone())
            .with_details(serde_json::json!({
                "itemIndex": item_index,
                "status": error.status,
                "httpCode": error.http_code(),
                "body": error.raw_body.clone().unwrap_or(Value::Null),
            }))
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.message, description),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for NodeError {}

impl From<std::io::Error> for NodeError {
    fn from(err: std::io::Error) -> Self {
        NodeError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::invalid_params(format!("Invalid JSON: {}", err))
    }
}
