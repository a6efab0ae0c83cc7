//! HTTP trigger for scrape runs.
//!
//! `POST /scrape` runs one scrape through a [`ScrapeWorker`] (by default a
//! child `scrape` process) and, when it succeeds, posts the spreadsheet link
//! to the caller's webhook. `GET /` is a liveness probe.

use anyhow::{Context, Result};
use tokio::net::TcpListener;

pub mod app;
pub mod routes;
pub mod webhook;
pub mod worker;

pub use app::{AppState, router};
pub use routes::{ScrapeRequest, TriggerError};
pub use webhook::{CompletionNotice, WebhookNotifier};
pub use worker::{ExitState, ProcessWorker, ScrapeWorker, WorkerOutcome};

/// Serve until Ctrl-C, letting in-flight requests finish.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(target: "server", %addr, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!(target: "server", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(target: "server", "shutdown requested"),
        Err(e) => {
            tracing::error!(target: "server", error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
