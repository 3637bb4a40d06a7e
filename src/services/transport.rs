//! Outbound HTTP for the node.
//!
//! The transport turns every failure into a structured JSON value, the
//! shape the error normalizer probes. A 2xx response yields its parsed body.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::errors::NodeError;
use crate::node::assembler::RequestBody;
use crate::node::operations::HttpMethod;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<RequestBody>,
}

/// A failed call as the transport observed it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaughtError(pub Value);

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, CaughtError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid header {name}")]
    InvalidHeader { name: String },
}

impl From<TransportError> for NodeError {
    fn from(err: TransportError) -> Self {
        NodeError::internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// No request timeout is set; the client's own defaults apply.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("browserflow-node/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn header_map(headers: &[(&'static str, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            TransportError::InvalidHeader {
                name: name.to_string(),
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader {
                name: name.to_string(),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn request_error(err: &reqwest::Error) -> CaughtError {
    let mut caught = serde_json::json!({
        "name": "RequestError",
        "message": err.to_string(),
        "timeout": err.is_timeout(),
        "connect": err.is_connect(),
    });
    if let Some(status) = err.status() {
        caught["statusCode"] = Value::from(status.as_u16());
    }
    CaughtError(caught)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, CaughtError> {
        let headers = header_map(&request.headers).map_err(|err| {
            CaughtError(serde_json::json!({ "name": "RequestError", "message": err.to_string() }))
        })?;

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), request.url.clone())
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| request_error(&err))?;
        let status = response.status();
        let status_message = status.canonical_reason().unwrap_or("").to_string();
        let text = response.text().await.map_err(|err| request_error(&err))?;
        let body = parse_body(&text);

        if status.is_success() {
            return Ok(body);
        }
        Err(CaughtError(serde_json::json!({
            "name": "HttpError",
            "message": format!("Request failed with status code {}", status.as_u16()),
            "response": {
                "statusCode": status.as_u16(),
                "statusMessage": status_message,
                "body": body,
            },
        })))
    }
}
