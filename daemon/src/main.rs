//! subgen builds a subtangle anchored to the network frontier and publishes it.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use subgen_client::HttpLedgerClient;
use subgen_engine::logging::{init_logging, LogFormat};
use subgen_engine::{spawn_line_listener, stop_channel, GeneratorConfig, Orchestrator, RunMode};
use subgen_store::FileCheckpointStore;

#[derive(Parser, Debug)]
#[command(name = "subgen", about = "Generate and broadcast a subtangle")]
struct Cli {
    /// Number of records in the subtangle.
    #[arg(long = "txs", env = "SUBGEN_TXS")]
    records: Option<usize>,

    /// Node API endpoint.
    #[arg(long, env = "SUBGEN_NODE")]
    node: Option<String>,

    /// Tag carried by every record (A-Z and 9, at most 27 characters).
    #[arg(long, env = "SUBGEN_TAG")]
    tag: Option<String>,

    /// Do proof-of-work locally instead of on the node.
    #[arg(long, env = "SUBGEN_LOCAL_POW")]
    local_pow: bool,

    /// Interval between broadcasting two records, in milliseconds.
    #[arg(long, env = "SUBGEN_BROADCAST_INTERVAL")]
    broadcast_interval: Option<u64>,

    /// Generate records until enter is pressed, then broadcast them.
    #[arg(long, env = "SUBGEN_RETAIN")]
    retain: bool,

    /// How many of the latest records new parents are drawn from.
    #[arg(long, alias = "wideness", env = "SUBGEN_WINDOW")]
    window: Option<usize>,

    /// Checkpoint file for the unpublished subtangle.
    #[arg(long, env = "SUBGEN_CHECKPOINT")]
    checkpoint: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SUBGEN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SUBGEN_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Apply the flags that were given on top of `base`.
    fn layer_over(self, base: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            records: self.records.unwrap_or(base.records),
            node: self.node.unwrap_or(base.node),
            tag: self.tag.unwrap_or(base.tag),
            remote_pow: base.remote_pow && !self.local_pow,
            broadcast_interval_ms: self
                .broadcast_interval
                .unwrap_or(base.broadcast_interval_ms),
            retain: base.retain || self.retain,
            window: self.window.unwrap_or(base.window),
            checkpoint_path: self.checkpoint.unwrap_or(base.checkpoint_path),
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match cli.config {
        Some(ref path) => GeneratorConfig::from_toml_file(&path.to_string_lossy())
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let config = cli.layer_over(base);

    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    init_logging(format, &config.log_level)?;

    let client = HttpLedgerClient::new(config.node.clone(), config.pow_mode());
    let store = FileCheckpointStore::new(config.checkpoint_path.clone());
    let mut orchestrator = Orchestrator::new(&config, client, store)?;

    tracing::info!(
        node = %config.node,
        tag = %config.tag,
        remote_pow = config.remote_pow,
        window = config.window,
        checkpoint = %config.checkpoint_path.display(),
        "starting subgen"
    );

    let (stop, listener) = if config.retain {
        tracing::info!("retain mode, generating records indefinitely (press enter to broadcast)");
        let (handle, signal) = stop_channel();
        (Some(signal), Some(spawn_line_listener(tokio::io::stdin(), handle)))
    } else {
        (None, None)
    };

    let result = orchestrator.run(stop).await;
    match &result {
        Ok(outcome) => tracing::info!(
            resumed = outcome.mode == RunMode::Resume,
            records = outcome.records,
            published = outcome.report.published,
            failed = outcome.report.failed,
            "subgen finished"
        ),
        Err(e) => tracing::error!(error = %e, "subgen failed"),
    }

    // A pending stdin read holds a blocking thread the runtime would wait on.
    if listener.is_some_and(|l| !l.is_finished()) {
        std::process::exit(if result.is_ok() { 0 } else { 1 });
    }

    result?;
    Ok(())
}
