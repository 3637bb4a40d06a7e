#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use browserflow::node::Dispatcher;
use browserflow::services::config::NodeConfig;
use browserflow::services::logger::Logger;
use browserflow::services::transport::{ApiRequest, CaughtError, HttpTransport};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Answers calls from a fixed script and records every request it saw.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<StdMutex<VecDeque<Result<Value, CaughtError>>>>,
    seen: Arc<StdMutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<Value, CaughtError>>) -> Self {
        Self {
            replies: Arc::new(StdMutex::new(replies.into())),
            seen: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, CaughtError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({ "success": true })))
    }
}

/// Caught value shaped like an HTTP failure with a JSON body.
pub fn http_failure(status: u16, status_message: &str, body: Value) -> CaughtError {
    CaughtError(serde_json::json!({
        "name": "HttpError",
        "message": format!("Request failed with status code {}", status),
        "response": {
            "statusCode": status,
            "statusMessage": status_message,
            "body": body,
        },
    }))
}

pub fn config() -> NodeConfig {
    NodeConfig::new("test-key").expect("config")
}

pub fn dispatcher(transport: &ScriptedTransport) -> Dispatcher {
    dispatcher_with(config(), transport)
}

pub fn dispatcher_with(config: NodeConfig, transport: &ScriptedTransport) -> Dispatcher {
    Dispatcher::new(config, Arc::new(transport.clone()), Logger::new("test"))
}
