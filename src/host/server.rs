use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::constants::node as node_info;
use crate::errors::{ErrorCode, NodeError, RpcError};
use crate::host::protocol::{ExecuteParams, JsonRpcRequest, JsonRpcResponse};
use crate::node::schema::{fields, EXECUTION_OPTIONS, FOLLOW_PAGE_FILTERS};
use crate::node::{Dispatcher, Operation};
use crate::services::config::NodeConfig;
use crate::services::logger::Logger;
use crate::services::transport::{HttpTransport, ReqwestTransport};

/// Line-delimited JSON-RPC front end for a workflow host.
pub struct NodeServer {
    dispatcher: Dispatcher,
    logger: Logger,
}

impl NodeServer {
    pub fn new(config: NodeConfig, transport: Arc<dyn HttpTransport>, logger: Logger) -> Self {
        let logger = logger.child("host");
        Self {
            dispatcher: Dispatcher::new(config, transport, logger.clone()),
            logger,
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "name": node_info::NAME,
            "displayName": node_info::DISPLAY_NAME,
            "version": node_info::VERSION,
            "outputMode": self.dispatcher.config().output_mode,
        })
    }

    fn handle_operations_list(&self) -> Value {
        let operations: Vec<Value> = Operation::ALL
            .iter()
            .map(|op| {
                let mut entry = op.describe();
                entry["fields"] = serde_json::to_value(fields(*op)).unwrap_or(Value::Null);
                if *op == Operation::InviteToFollowPage {
                    entry["filterFields"] =
                        serde_json::to_value(FOLLOW_PAGE_FILTERS).unwrap_or(Value::Null);
                }
                if op.accepts_execution_options() {
                    entry["executionFields"] =
                        serde_json::to_value(EXECUTION_OPTIONS).unwrap_or(Value::Null);
                }
                entry
            })
            .collect();
        serde_json::json!({ "operations": operations })
    }

    async fn handle_execute(&self, params: Value) -> Result<Value, NodeError> {
        let params: ExecuteParams = serde_json::from_value(params).map_err(|err| {
            NodeError::invalid_params(format!("Invalid node/execute params: {}", err))
        })?;
        let dispatcher = match params.output_mode {
            Some(mode) => self.dispatcher.with_output_mode(mode),
            None => self.dispatcher.clone(),
        };
        let outputs = dispatcher.run(&params.items, params.continue_on_fail).await?;
        Ok(serde_json::json!({ "outputs": outputs.into_streams() }))
    }

    /// Answers one request. Notifications (no id) get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") && request.id.is_none() {
            return None;
        }
        let id = request.id?;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "operations/list" => JsonRpcResponse::success(id, self.handle_operations_list()),
            "node/execute" => match self.handle_execute(request.params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(err) => JsonRpcResponse::failure(id, RpcError::from(err)),
            },
            _ => JsonRpcResponse::failure(
                id,
                RpcError::new(ErrorCode::MethodNotFound, "Method not found")
                    .with_data(serde_json::json!({ "method": request.method })),
            ),
        };
        Some(response)
    }

    /// Reads requests line by line until EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), NodeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);
        self.logger.info("Host loop started", None);

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        RpcError::new(ErrorCode::ParseError, "Parse error"),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let request: JsonRpcRequest = match serde_json::from_value(parsed) {
                Ok(req) => req,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        RpcError::new(ErrorCode::InvalidRequest, "Invalid request"),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            self.logger.debug(
                "Request received",
                Some(&serde_json::json!({ "method": request.method })),
            );
            if let Some(response) = self.handle_request(request).await {
                write_response(&mut writer, &response).await?;
            }
        }

        self.logger.info("Host loop finished", Some(&self.logger.stats()));
        Ok(())
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), NodeError>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_string(response)?;
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn run_stdio(config: NodeConfig, logger: Logger) -> Result<(), NodeError> {
    let transport = Arc::new(ReqwestTransport::new()?);
    let server = NodeServer::new(config, transport, logger);
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
