//! `browserflow-node` entry point.
//!
//! - `serve` answers JSON-RPC requests from a workflow host on stdio.
//! - `run` executes one batch file and prints the output streams.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use browserflow::constants::env;
use browserflow::errors::NodeError;
use browserflow::host::protocol::ExecuteParams;
use browserflow::node::{Dispatcher, InputItem, OutputMode};
use browserflow::services::config::NodeConfig;
use browserflow::services::logger::{LogLevel, Logger};
use browserflow::services::transport::ReqwestTransport;

#[derive(Parser)]
#[command(name = "browserflow-node", about = "Browserflow LinkedIn automation node", version)]
struct Cli {
    /// Browserflow API key.
    #[arg(long, global = true, env = env::API_KEY, hide_env_values = true)]
    api_key: Option<String>,
    /// Override the API base URL.
    #[arg(long, global = true, env = env::BASE_URL)]
    base_url: Option<String>,
    /// merged | split
    #[arg(long, global = true, env = env::OUTPUT_MODE)]
    output_mode: Option<String>,
    /// error | warn | info | debug
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve JSON-RPC requests on stdin/stdout.
    Serve,
    /// Execute one batch and print its outputs.
    Run {
        /// JSON file holding `{ "items": [...] }` or a bare item array.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        continue_on_fail: bool,
    },
}

fn build_config(cli: &Cli) -> Result<NodeConfig, NodeError> {
    let mut config = NodeConfig::new(cli.api_key.clone().unwrap_or_default())?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(raw) = &cli.output_mode {
        let mode = OutputMode::parse(raw).ok_or_else(|| {
            NodeError::invalid_params(format!("Unknown output mode: {}", raw))
                .with_hint("Use one of: merged, split.")
        })?;
        config = config.with_output_mode(mode);
    }
    Ok(config)
}

fn build_logger(cli: &Cli) -> Logger {
    let mut logger = Logger::new("browserflow");
    if let Some(level) = cli.log_level.as_deref().and_then(LogLevel::parse) {
        logger.set_level(level);
    }
    logger
}

fn read_batch(path: &Path) -> Result<(Vec<InputItem>, bool), NodeError> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        NodeError::invalid_params(format!("Cannot read {}: {}", path.display(), err))
    })?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    if value.is_array() {
        return Ok((serde_json::from_value(value)?, false));
    }
    let params: ExecuteParams = serde_json::from_value(value)?;
    Ok((params.items, params.continue_on_fail))
}

async fn run(cli: Cli) -> Result<(), NodeError> {
    let config = build_config(&cli)?;
    let logger = build_logger(&cli);

    match cli.command {
        Command::Serve => browserflow::host::run_stdio(config, logger).await,
        Command::Run {
            input,
            continue_on_fail,
        } => {
            let (items, file_continue) = read_batch(&input)?;
            let transport = Arc::new(ReqwestTransport::new()?);
            let dispatcher = Dispatcher::new(config, transport, logger);
            let outputs = dispatcher.run(&items, continue_on_fail || file_continue).await?;
            let payload = serde_json::json!({ "outputs": outputs.into_streams() });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("browserflow-node: {}", err);
        if let Some(hint) = &err.hint {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}
