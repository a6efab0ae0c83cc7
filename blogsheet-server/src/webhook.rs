use blogsheet_config::BlogsheetConfig;
use blogsheet_http::{HttpClient, HttpError, RequestOpts};
use serde::Serialize;
use std::time::Duration;

/// Body posted to the caller's webhook once a scrape has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionNotice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub link: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("spreadsheet id is not configured")]
    MissingSpreadsheet,
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Tells webhooks where the freshly written spreadsheet lives.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    email: Option<String>,
    spreadsheet_url: Option<String>,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(email: Option<String>, spreadsheet_url: Option<String>) -> Self {
        Self {
            email,
            spreadsheet_url,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn from_config(config: &BlogsheetConfig) -> Self {
        Self::new(config.notify.email.clone(), config.sheets.spreadsheet_url())
    }

    pub fn notice(&self) -> Result<CompletionNotice, NotifyError> {
        let link = self
            .spreadsheet_url
            .clone()
            .ok_or(NotifyError::MissingSpreadsheet)?;
        Ok(CompletionNotice {
            email: self.email.clone(),
            link,
        })
    }

    /// POST the completion notice as JSON to `webhook_url`. Returns the reply body.
    pub async fn notify(&self, webhook_url: &str) -> Result<String, NotifyError> {
        let notice = self.notice()?;
        let client = HttpClient::new(webhook_url)?.with_timeout(self.timeout);
        let reply = client
            .post_json_text("", &notice, RequestOpts::default())
            .await?;
        tracing::info!(target: "webhook", url = webhook_url, "webhook notified");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notice_omits_missing_email() {
        let notifier = WebhookNotifier::new(
            None,
            Some("https://docs.google.com/spreadsheets/d/abc".into()),
        );
        let body = serde_json::to_value(notifier.notice().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"link": "https://docs.google.com/spreadsheets/d/abc"})
        );
    }

    #[test]
    fn notice_requires_spreadsheet() {
        let notifier = WebhookNotifier::new(Some("ops@example.com".into()), None);
        assert!(matches!(
            notifier.notice(),
            Err(NotifyError::MissingSpreadsheet)
        ));
    }
}
