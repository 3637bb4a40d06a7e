use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{NodeError, NodeErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ExecutionFailed = -32000,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<NodeError> for RpcError {
    fn from(err: NodeError) -> Self {
        let code = match err.kind {
            NodeErrorKind::InvalidParams | NodeErrorKind::UnknownOperation => {
                ErrorCode::InvalidParams
            }
            NodeErrorKind::RemoteRequest => ErrorCode::ExecutionFailed,
            NodeErrorKind::Internal => ErrorCode::InternalError,
        };
        let data = serde_json::to_value(&err).unwrap_or(Value::Null);
        RpcError::new(code, err.message).with_data(data)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RpcError {}
