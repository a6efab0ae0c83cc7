use crate::{Result, SheetsClient};
use async_trait::async_trait;
use blogsheet_common::{ArticleRecord, SheetRow};
use std::sync::Arc;

/// Destination for spreadsheet rows.
#[async_trait]
pub trait SheetSink: Send + Sync {
    async fn clear(&self, range: &str) -> Result<()>;
    async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<u64>;
}

#[async_trait]
impl SheetSink for SheetsClient {
    async fn clear(&self, range: &str) -> Result<()> {
        SheetsClient::clear(self, range).await
    }

    async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<u64> {
        SheetsClient::append(self, range, rows).await
    }
}

/// Replaces a range with a header row plus one row per record.
pub struct SheetWriter {
    sink: Arc<dyn SheetSink>,
    range: String,
}

impl SheetWriter {
    pub fn new(sink: Arc<dyn SheetSink>, range: impl Into<String>) -> Self {
        Self {
            sink,
            range: range.into(),
        }
    }

    /// Clear the range, then append header and records in one call.
    /// Returns the number of rows the sink reports as written.
    pub async fn persist(&self, records: &[ArticleRecord]) -> Result<u64> {
        let rows: Vec<Vec<String>> = std::iter::once(SheetRow::header())
            .chain(records.iter().map(SheetRow::from))
            .map(SheetRow::into_cells)
            .collect();

        self.sink.clear(&self.range).await?;
        let written = self.sink.append(&self.range, rows).await?;
        tracing::info!(
            target: "sheets.write",
            range = %self.range,
            records = records.len(),
            written,
            "sheet updated"
        );
        Ok(written)
    }
}
