use crate::{Result, SheetsError, TokenProvider};
use blogsheet_config::SheetsConfig;
use blogsheet_http::{HttpClient, RequestOpts};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Google Sheets v4 `values` endpoints for one spreadsheet.
pub struct SheetsClient {
    http: HttpClient,
    spreadsheet_id: String,
    tokens: Arc<dyn TokenProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_rows: u64,
}

impl SheetsClient {
    pub fn new(
        api_base: &str,
        spreadsheet_id: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(api_base)?,
            spreadsheet_id: spreadsheet_id.into(),
            tokens,
        })
    }

    pub fn from_config(config: &SheetsConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let id = config
            .spreadsheet_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(SheetsError::MissingSpreadsheetId)?;
        Self::new(&config.api_base, id, tokens)
    }

    fn values_path(&self, range: &str, action: &str) -> String {
        format!(
            "v4/spreadsheets/{}/values/{range}:{action}",
            self.spreadsheet_id
        )
    }

    /// Clear every value in `range`.
    pub async fn clear(&self, range: &str) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let _: Value = self
            .http
            .post_json(
                &self.values_path(range, "clear"),
                &json!({}),
                RequestOpts {
                    bearer: Some(&token),
                    ..Default::default()
                },
            )
            .await?;
        tracing::debug!(target: "sheets.api", range, "range cleared");
        Ok(())
    }

    /// Append `rows` after the last row of `range`; returns the row count the API reports.
    pub async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<u64> {
        let token = self.tokens.access_token().await?;
        let reply: AppendResponse = self
            .http
            .post_json(
                &self.values_path(range, "append"),
                &json!({ "values": rows }),
                RequestOpts {
                    bearer: Some(&token),
                    query: vec![
                        ("valueInputOption", "RAW"),
                        ("insertDataOption", "INSERT_ROWS"),
                    ],
                    ..Default::default()
                },
            )
            .await?;
        let updated = reply.updates.map_or(0, |u| u.updated_rows);
        tracing::debug!(target: "sheets.api", range, updated, "rows appended");
        Ok(updated)
    }
}
