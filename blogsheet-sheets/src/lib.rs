//! Spreadsheet persistence for scraped articles.
//!
//! [`SheetWriter`] replaces the contents of a configured range with a header
//! row plus one row per record. It writes through a [`SheetSink`]; the
//! production sink is [`SheetsClient`], which talks to the Google Sheets v4
//! REST API using tokens from a [`TokenProvider`].

use blogsheet_config::SheetsConfig;
use std::sync::Arc;

pub mod auth;
pub mod client;
pub mod writer;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, StaticToken, TokenProvider};
pub use client::SheetsClient;
pub use writer::{SheetSink, SheetWriter};

#[derive(thiserror::Error, Debug)]
pub enum SheetsError {
    /// The service-account key could not be read or parsed.
    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Http(#[from] blogsheet_http::HttpError),

    #[error("Spreadsheet id is not configured (set SPREADSHEET_ID or sheets.spreadsheet_id)")]
    MissingSpreadsheetId,
}

pub type Result<T> = std::result::Result<T, SheetsError>;

/// Writer backed by the Sheets API, authenticated with the configured service account.
pub fn connect(config: &SheetsConfig) -> Result<SheetWriter> {
    let key = ServiceAccountKey::load(&config.credentials)?;
    let tokens = Arc::new(ServiceAccountAuth::new(key)?);
    let client = SheetsClient::from_config(config, tokens)?;
    Ok(SheetWriter::new(Arc::new(client), config.range.clone()))
}
