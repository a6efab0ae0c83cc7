use crate::routes::{health, scrape};
use crate::webhook::WebhookNotifier;
use crate::worker::ScrapeWorker;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub worker: Arc<dyn ScrapeWorker>,
    pub notifier: Arc<WebhookNotifier>,
}

impl AppState {
    pub fn new(worker: Arc<dyn ScrapeWorker>, notifier: WebhookNotifier) -> Self {
        Self {
            worker,
            notifier: Arc::new(notifier),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/scrape", post(scrape))
        .with_state(state)
}
