//! Where per-item outcomes go.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::errors::SPLIT_FAILURE_MESSAGE;
use crate::errors::NodeError;
use crate::node::normalize::NormalizedError;

/// Chosen once per batch from the host's continue-on-fail flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    HardFail,
    Continue,
}

impl FailureMode {
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailureMode::Continue
        } else {
            FailureMode::HardFail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Successes and error records share one stream.
    #[default]
    Merged,
    /// Successes on the first stream, error records on the second.
    Split,
}

impl OutputMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "merged" | "single" => Some(OutputMode::Merged),
            "split" | "two" => Some(OutputMode::Split),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemResult {
    Success { body: Value },
    Failure { error: NormalizedError, item_index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputChannels {
    Merged(Vec<Value>),
    Split {
        successes: Vec<Value>,
        failures: Vec<Value>,
    },
}

impl OutputChannels {
    pub fn new(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Merged => OutputChannels::Merged(Vec::new()),
            OutputMode::Split => OutputChannels::Split {
                successes: Vec::new(),
                failures: Vec::new(),
            },
        }
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            OutputChannels::Merged(_) => OutputMode::Merged,
            OutputChannels::Split { .. } => OutputMode::Split,
        }
    }

    pub fn push_success(&mut self, body: Value) {
        match self {
            OutputChannels::Merged(items) => items.push(body),
            OutputChannels::Split { successes, .. } => successes.push(body),
        }
    }

    /// Appends the error record for `item_index`. In merged mode the record
    /// extends the item's own input JSON with an `error` object.
    pub fn push_failure(&mut self, item_index: usize, error: &NormalizedError, input: &Value) {
        match self {
            OutputChannels::Merged(items) => items.push(merged_error_record(item_index, error, input)),
            OutputChannels::Split { failures, .. } => {
                failures.push(split_error_record(item_index, error))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OutputChannels::Merged(items) => items.len(),
            OutputChannels::Split {
                successes,
                failures,
            } => successes.len() + failures.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Streams in host output order.
    pub fn into_streams(self) -> Vec<Vec<Value>> {
        match self {
            OutputChannels::Merged(items) => vec![items],
            OutputChannels::Split {
                successes,
                failures,
            } => vec![successes, failures],
        }
    }
}

fn merged_error_record(item_index: usize, error: &NormalizedError, input: &Value) -> Value {
    let mut record = input.as_object().cloned().unwrap_or_else(Map::new);
    record.insert(
        "error".into(),
        serde_json::json!({
            "itemIndex": item_index,
            "message": error.banner(),
            "description": error.message,
            "httpCode": error.http_code(),
            "body": error.raw_body.clone().unwrap_or(Value::Null),
        }),
    );
    Value::Object(record)
}

fn split_error_record(item_index: usize, error: &NormalizedError) -> Value {
    serde_json::json!({
        "itemIndex": item_index,
        "status": error.status,
        "message": SPLIT_FAILURE_MESSAGE,
        "detail": error.message,
    })
}

/// Decision for one failed item.
#[derive(Debug)]
pub enum Routed {
    Recorded,
    Abort(NodeError),
}

#[derive(Debug, Clone, Copy)]
pub struct FailureRouter {
    mode: FailureMode,
}

impl FailureRouter {
    pub fn new(mode: FailureMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    pub fn route(
        &self,
        outputs: &mut OutputChannels,
        item_index: usize,
        error: &NormalizedError,
        input: &Value,
    ) -> Routed {
        match self.mode {
            FailureMode::HardFail => Routed::Abort(NodeError::remote_request(error, item_index)),
            FailureMode::Continue => {
                outputs.push_failure(item_index, error, input);
                Routed::Recorded
            }
        }
    }
}
