//! Batch execution loop.
//!
//! Items run strictly one after another: each item's request completes
//! before the next item is read, and output order follows input order.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::constants::node::{DEFAULT_OPERATION, RESOURCE_LINKEDIN};
use crate::errors::NodeError;
use crate::node::assembler::{build_body, display_string, job_id};
use crate::node::execution_options::ExecutionOptions;
use crate::node::normalize::normalize;
use crate::node::operations::{known_operation_ids, resolve, Operation};
use crate::node::params::RawParameters;
use crate::node::router::{
    FailureMode, FailureRouter, ItemResult, OutputChannels, OutputMode, Routed,
};
use crate::node::schema::resolve_parameters;
use crate::services::config::NodeConfig;
use crate::services::logger::Logger;
use crate::services::transport::{ApiRequest, CaughtError, HttpTransport};
use crate::utils::operation_errors::unknown_operation_error;
use crate::utils::redact::redact_headers;

/// One input item: the JSON it carries downstream and the parameter values
/// the host resolved for it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Value,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl InputItem {
    pub fn new(parameters: Value) -> Self {
        Self {
            json: Value::Object(Map::new()),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = json;
        self
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    config: NodeConfig,
    transport: Arc<dyn HttpTransport>,
    logger: Logger,
}

impl Dispatcher {
    pub fn new(config: NodeConfig, transport: Arc<dyn HttpTransport>, logger: Logger) -> Self {
        Self {
            config,
            transport,
            logger: logger.child("dispatch"),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Same dispatcher writing to a different output layout.
    pub fn with_output_mode(&self, mode: OutputMode) -> Self {
        let mut next = self.clone();
        next.config = next.config.with_output_mode(mode);
        next
    }

    /// Runs a batch. In hard-fail mode the first failed item ends the batch
    /// with an error and nothing is returned for it; in continue mode failed
    /// items are recorded and the loop goes on. An unknown operation always
    /// ends the batch.
    pub async fn run(
        &self,
        items: &[InputItem],
        continue_on_fail: bool,
    ) -> Result<OutputChannels, NodeError> {
        let batch_id = uuid::Uuid::new_v4().to_string();
        let router = FailureRouter::new(FailureMode::from_continue_on_fail(continue_on_fail));
        let mut outputs = OutputChannels::new(self.config.output_mode);
        self.logger.info(
            "Batch started",
            Some(&serde_json::json!({
                "batch_id": batch_id,
                "items": items.len(),
                "mode": router.mode(),
                "output": self.config.output_mode,
            })),
        );

        for (index, item) in items.iter().enumerate() {
            match self.execute_item(index, item).await? {
                ItemResult::Success { body } => outputs.push_success(body),
                ItemResult::Failure { error, item_index } => {
                    match router.route(&mut outputs, item_index, &error, &item.json) {
                        Routed::Recorded => self.logger.warn(
                            "Item failed, continuing",
                            Some(&serde_json::json!({
                                "batch_id": batch_id,
                                "item": item_index,
                                "status": error.status,
                                "message": error.message,
                            })),
                        ),
                        Routed::Abort(err) => {
                            self.logger.error(
                                "Item failed, aborting batch",
                                Some(&serde_json::json!({
                                    "batch_id": batch_id,
                                    "item": item_index,
                                    "status": error.status,
                                    "message": error.message,
                                })),
                            );
                            return Err(err);
                        }
                    }
                }
            }
        }

        self.logger.info(
            "Batch finished",
            Some(&serde_json::json!({ "batch_id": batch_id, "records": outputs.len() })),
        );
        Ok(outputs)
    }

    async fn execute_item(&self, index: usize, item: &InputItem) -> Result<ItemResult, NodeError> {
        let params = RawParameters::from_map(item.parameters.clone());

        let resource = params.get("resource");
        if !resource.map_or(true, |value| value.as_str() == Some(RESOURCE_LINKEDIN)) {
            self.logger.debug(
                "Unsupported resource, passing item through",
                Some(&serde_json::json!({ "item": index, "resource": resource })),
            );
            return Ok(ItemResult::Success {
                body: serde_json::json!({ "success": true }),
            });
        }

        let op = match params.get("operation") {
            None => resolve(DEFAULT_OPERATION)?,
            Some(Value::String(id)) => resolve(id)?,
            Some(other) => {
                return Err(unknown_operation_error(
                    &display_string(other),
                    &known_operation_ids(),
                ))
            }
        };
        let resolved = match resolve_parameters(op, &params) {
            Ok(resolved) => resolved,
            Err(issue) => {
                return Ok(ItemResult::Failure {
                    error: normalize(&issue.to_caught()),
                    item_index: index,
                })
            }
        };

        let request = self.build_request(op, &resolved)?;
        self.logger.debug(
            "Sending request",
            Some(&serde_json::json!({
                "item": index,
                "operation": op.id(),
                "method": request.method.as_str(),
                "url": request.url.as_str(),
                "headers": redact_headers(request.headers.iter().map(|(k, v)| (*k, v.as_str()))),
            })),
        );

        match self.transport.send(request).await {
            Ok(response) => Ok(ItemResult::Success {
                body: wrap_response(response),
            }),
            Err(CaughtError(caught)) => Ok(ItemResult::Failure {
                error: normalize(&caught),
                item_index: index,
            }),
        }
    }

    /// Assembles the outbound call for one item.
    pub fn build_request(
        &self,
        op: Operation,
        params: &RawParameters,
    ) -> Result<ApiRequest, NodeError> {
        let mut body = build_body(op, params);
        if let Some(body) = body.as_mut() {
            ExecutionOptions::from_params(params).apply(op, body);
        }
        let url = self.config.endpoint(&op.path(job_id(params).as_deref()))?;
        Ok(ApiRequest {
            method: op.http_method(),
            url,
            headers: self.config.headers(),
            body,
        })
    }
}

/// Objects pass through; anything else is wrapped as `{ "data": ... }` so
/// every output record is an object.
pub fn wrap_response(response: Value) -> Value {
    match response {
        Value::Object(_) => response,
        other => serde_json::json!({ "data": other }),
    }
}
