//! Symphony Datafeed Smoke Test CLI
//!
//! Commands:
//! - `auth`: run the certificate handshake and report success
//! - `listen`: poll the datafeed and capture messages as JSONL
//!
//! # Usage
//! ```bash
//! # All commands read SYMPHONY_* environment variables:
//! # SYMPHONY_SESSIONAUTH_URL, SYMPHONY_KEYAUTH_URL, SYMPHONY_AGENT_URL,
//! # SYMPHONY_POD_URL, SYMPHONY_USER_CERT_FILE, SYMPHONY_USER_CERT_PASSWORD
//! # and optionally SYMPHONY_TRUSTSTORE_FILE / SYMPHONY_TRUSTSTORE_PASSWORD
//!
//! sym_smoke auth
//! sym_smoke listen --out data/feed_raw.jsonl --limit 100
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::info;

use symphony_adapter::feed::{ChannelListener, FeedWorker};
use symphony_adapter::{SymphonyClient, SymphonyConfig};

#[derive(Parser)]
#[command(name = "sym_smoke")]
#[command(about = "Symphony datafeed smoke test CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate against the pod and key manager, then exit
    Auth,

    /// Poll the datafeed and capture messages
    Listen {
        /// Output file path for raw JSONL (default: data/feed_<timestamp>.jsonl)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Maximum messages to collect (0 = unlimited until Ctrl+C)
        #[arg(long, default_value = "100")]
        limit: u64,

        /// Hand-off channel capacity between poller and writer
        #[arg(long, default_value = "256")]
        channel_capacity: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    // Setup Ctrl+C handler
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, shutting down...");
        shutdown_clone.store(true, Ordering::Relaxed);
    });

    let config = SymphonyConfig::from_env()
        .context("Missing configuration. Set the SYMPHONY_* environment variables")?;

    match cli.command {
        Commands::Auth => run_auth(&config).await,
        Commands::Listen { out, limit, channel_capacity } => {
            let out = out.unwrap_or_else(default_output_path);
            run_listen(&config, out, limit, channel_capacity, shutdown).await
        }
    }
}

/// Generate a timestamped output path
fn default_output_path() -> PathBuf {
    let now = chrono::Utc::now();
    PathBuf::from(format!("data/feed_{}.jsonl", now.format("%Y%m%d_%H%M%S")))
}

async fn run_auth(config: &SymphonyConfig) -> Result<()> {
    info!("=== Auth Smoke Test ===");
    info!("Session auth: {}", config.session_auth_url);
    info!("Key auth: {}", config.key_auth_url);

    let client = SymphonyClient::connect(config).await?;

    info!("Handshake complete against pod {}", client.pod_url());
    Ok(())
}

async fn run_listen(
    config: &SymphonyConfig,
    out: PathBuf,
    limit: u64,
    channel_capacity: usize,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    info!("=== Datafeed Smoke Test ===");
    info!("Agent: {}", config.agent_url);
    info!("Output: {}", out.display());

    let client = SymphonyClient::connect(config).await?;

    if let Some(parent) = out.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }
    let mut file =
        tokio::fs::File::create(&out).await.context("Failed to create output file")?;

    // Bounded hand-off keeps file latency off the polling task
    let (listener, mut rx) = ChannelListener::bounded(channel_capacity);
    let mut worker = FeedWorker::new(client.datafeed_client(), listener);

    let worker_shutdown = shutdown.clone();
    let worker_task = tokio::spawn(async move { worker.run(limit, worker_shutdown).await });

    // Writer side: log each message and append raw JSONL
    while let Some(message) = rx.recv().await {
        info!(
            "Message {} on stream {}",
            message.id,
            message.stream_id.as_deref().unwrap_or("<unknown>")
        );
        let line = serde_json::to_string(&message)?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }
    file.flush().await?;

    let stats = worker_task.await.context("Feed worker panicked")?;

    info!("Listen complete");
    info!("  Dispatched: {}", stats.messages_dispatched);
    info!("  Batches: {} (+{} empty reads)", stats.batches_received, stats.empty_reads);
    info!("  Feed creations: {} ({} failed attempts)", stats.feeds_created, stats.create_failures);
    info!("  Read failures: {}", stats.read_failures);

    Ok(())
}
