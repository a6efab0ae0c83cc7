//! HTTP trigger: runs `scrape` per request and notifies the caller's webhook.

use anyhow::{Context, Result};
use blogsheet_app::bootstrap;
use blogsheet_server::{AppState, ProcessWorker, WebhookNotifier};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "blogsheet-server", version, about = "HTTP trigger for blog scrapes")]
struct Cli {
    /// YAML configuration file, also handed to each scrape worker
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen port (overrides `server.port` and PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = bootstrap::load_config(cli.config.as_deref())?;
    bootstrap::init_logging("blogsheet-server", &config.log)?;

    let program = match &config.server.worker_program {
        Some(program) => program.clone(),
        None => bootstrap::sibling_binary("scrape")?,
    };
    let mut worker_args = Vec::new();
    if let Some(path) = &cli.config {
        worker_args.push("--config".to_string());
        worker_args.push(path.display().to_string());
    }
    // The category is user input; keep it from being read as a flag.
    worker_args.push("--".to_string());
    let worker = ProcessWorker::new(program).with_args(worker_args);
    tracing::info!(
        target: "server",
        program = %worker.program().display(),
        "scrape worker configured"
    );

    let state = AppState::new(Arc::new(worker), WebhookNotifier::from_config(&config));
    let port = cli.port.unwrap_or(config.server.port);
    let listener = TcpListener::bind((config.server.host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{port}", config.server.host))?;

    blogsheet_server::serve(listener, state).await
}
