use crate::release_session;
use anyhow::Result;
use blogsheet_common::{CategorySlug, Result as ScrapeResult, ScrapeError};
use blogsheet_drivers::{BrowserLauncher, BrowserSession};
use std::sync::Arc;

/// Finds category slugs in the site navigation.
pub struct CategoryDiscoverer {
    launcher: Arc<dyn BrowserLauncher>,
    link_selector: String,
}

impl CategoryDiscoverer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, link_selector: impl Into<String>) -> Self {
        Self {
            launcher,
            link_selector: link_selector.into(),
        }
    }

    /// Slugs in order of appearance. Duplicates are kept; links without a path are skipped.
    pub async fn discover(&self, base_url: &str) -> ScrapeResult<Vec<CategorySlug>> {
        let discovery_error = |e: anyhow::Error| ScrapeError::Discovery {
            url: base_url.to_string(),
            message: format!("{e:#}"),
        };

        let mut session = self.launcher.launch().await.map_err(discovery_error)?;
        let hrefs = self.read_links(session.as_mut(), base_url).await;
        release_session(session, base_url).await;

        let slugs: Vec<CategorySlug> = hrefs
            .map_err(discovery_error)?
            .iter()
            .filter_map(|href| CategorySlug::from_href(href))
            .collect();
        tracing::info!(
            target: "scrape.discover",
            url = base_url,
            count = slugs.len(),
            "categories discovered"
        );
        Ok(slugs)
    }

    async fn read_links(&self, session: &mut dyn BrowserSession, url: &str) -> Result<Vec<String>> {
        session.goto(url).await?;
        session.hrefs(&self.link_selector).await
    }
}
