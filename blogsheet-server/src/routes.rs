use crate::app::AppState;
use crate::worker::ExitState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use url::Url;

/// Body of `POST /scrape`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Every way a trigger request can fail, mapped to its status and plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Missing category or webhookUrl")]
    MissingField,
    #[error("Invalid webhookUrl")]
    InvalidWebhook,
    #[error("Error running scraper: {0}")]
    Spawn(String),
    #[error("Scraper exited with code {0}")]
    Exit(i32),
    #[error("Scraper was terminated by a signal")]
    Killed,
    #[error("Error sending webhook request: {0}")]
    Webhook(String),
}

impl TriggerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField | Self::InvalidWebhook => StatusCode::BAD_REQUEST,
            Self::Spawn(_) | Self::Exit(_) | Self::Killed | Self::Webhook(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub async fn health() -> &'static str {
    "Server is running"
}

/// Validated request: a non-empty category and an absolute http(s) webhook.
fn parse_request(body: &[u8]) -> Result<(String, Url), TriggerError> {
    let request: ScrapeRequest =
        serde_json::from_slice(body).map_err(|_| TriggerError::MissingField)?;
    let non_empty = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let (Some(category), Some(webhook)) =
        (non_empty(request.category), non_empty(request.webhook_url))
    else {
        return Err(TriggerError::MissingField);
    };
    let webhook = Url::parse(&webhook).map_err(|_| TriggerError::InvalidWebhook)?;
    if !matches!(webhook.scheme(), "http" | "https") || webhook.host_str().is_none() {
        return Err(TriggerError::InvalidWebhook);
    }
    Ok((category, webhook))
}

/// Runs detached from the request so a caller that hangs up does not cancel
/// the scrape or its webhook.
pub async fn scrape(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, TriggerError> {
    let (category, webhook) = parse_request(&body).inspect_err(|e| {
        tracing::warn!(target: "server.scrape", error = %e, "rejected scrape request");
    })?;
    tracing::info!(target: "server.scrape", %category, webhook = %webhook, "scrape requested");

    tokio::spawn(run_and_notify(state, category, webhook))
        .await
        .map_err(|e| {
            tracing::error!(target: "server.scrape", error = %e, "scrape task aborted");
            TriggerError::Spawn(e.to_string())
        })?
}

async fn run_and_notify(
    state: AppState,
    category: String,
    webhook: Url,
) -> Result<&'static str, TriggerError> {
    let outcome = state.worker.run(&category).await.map_err(|e| {
        let message = format!("{e:#}");
        tracing::error!(target: "server.scrape", error = %message, "scrape worker did not start");
        TriggerError::Spawn(message)
    })?;
    if !outcome.exit.success() {
        tracing::error!(
            target: "server.scrape",
            %category,
            exit = %outcome.exit,
            "scrape worker failed"
        );
        return Err(match outcome.exit {
            ExitState::Code(code) => TriggerError::Exit(code),
            ExitState::Signal => TriggerError::Killed,
        });
    }

    state.notifier.notify(webhook.as_str()).await.map_err(|e| {
        tracing::error!(target: "server.scrape", error = %e, "webhook request failed");
        TriggerError::Webhook(e.to_string())
    })?;
    tracing::info!(target: "server.scrape", %category, "webhook notified");

    Ok("Scraping completed and webhook request sent")
}
