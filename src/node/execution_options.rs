//! Polling and callback fields shared by every asynchronous-capable
//! operation.

use serde_json::Value;

use crate::node::assembler::RequestBody;
use crate::node::operations::Operation;
use crate::node::params::RawParameters;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub use_polling: bool,
    pub callback_url: Option<String>,
}

impl ExecutionOptions {
    /// Reads the `execution` collection together with top-level
    /// `use_polling` / `callback_url`. Polling is on when either source
    /// enables it, so a top-level `true` wins over a collection `false`.
    /// A non-blank collection callback takes precedence over a top-level one.
    pub fn from_params(params: &RawParameters) -> Self {
        let use_polling = params.bool_or("execution.use_polling", false)
            || params.bool_or("use_polling", false);
        let callback_url = callback(params, "execution.callback_url")
            .or_else(|| callback(params, "callback_url"));
        Self {
            use_polling,
            callback_url,
        }
    }

    /// Merges the set options into `body`. Runs after assembly; the two key
    /// sets never overlap.
    pub fn apply(&self, op: Operation, body: &mut RequestBody) {
        if !op.accepts_execution_options() {
            return;
        }
        if self.use_polling {
            body.insert("use_polling".into(), Value::Bool(true));
        }
        if let Some(url) = &self.callback_url {
            body.insert("callback_url".into(), Value::String(url.clone()));
        }
    }
}

fn callback(params: &RawParameters, name: &str) -> Option<String> {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
