use std::fmt;
use url::Url;

use crate::constants::api::{ACCEPT, BASE_URL, CONTENT_TYPE};
use crate::constants::env;
use crate::errors::NodeError;
use crate::node::router::OutputMode;
use crate::utils::env::env_string;

/// Everything a batch run needs from outside, fixed for the whole run.
#[derive(Clone, PartialEq)]
pub struct NodeConfig {
    base_url: Url,
    api_key: String,
    pub output_mode: OutputMode,
}

impl NodeConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, NodeError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(NodeError::invalid_params("API key must be a non-empty string")
                .with_hint(format!("Set {} or pass --api-key.", env::API_KEY)));
        }
        Ok(Self {
            base_url: parse_base_url(BASE_URL)?,
            api_key,
            output_mode: OutputMode::default(),
        })
    }

    /// `BROWSERFLOW_API_KEY` (required), `BROWSERFLOW_BASE_URL`,
    /// `BROWSERFLOW_OUTPUT_MODE`.
    pub fn from_env() -> Result<Self, NodeError> {
        let api_key = env_string(env::API_KEY).unwrap_or_default();
        let mut config = Self::new(api_key)?;
        if let Some(base) = env_string(env::BASE_URL) {
            config = config.with_base_url(&base)?;
        }
        if let Some(raw) = env_string(env::OUTPUT_MODE) {
            let mode = OutputMode::parse(&raw).ok_or_else(|| {
                NodeError::invalid_params(format!(
                    "{} must be one of: merged, split",
                    env::OUTPUT_MODE
                ))
            })?;
            config.output_mode = mode;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, NodeError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, NodeError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| NodeError::internal(format!("Invalid endpoint path {}: {}", path, err)))
    }

    /// Headers sent on every call.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Accept", ACCEPT.to_string()),
            ("Content-Type", CONTENT_TYPE.to_string()),
            ("Authorization", format!("Bearer {}", self.api_key)),
        ]
    }
}

impl fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("output_mode", &self.output_mode)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, NodeError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&with_slash)
        .map_err(|_| NodeError::invalid_params(format!("Invalid base URL: {}", raw)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(NodeError::invalid_params("Base URL must use http or https"));
    }
    Ok(url)
}
