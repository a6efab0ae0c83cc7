//! Listing expansion through the "load more" control.
//!
//! Pagination is a two-state machine. While [`PaginationState::MoreAvailable`]
//! the paginator waits for the control, clicks it and waits for the busy
//! marker to clear. It moves to [`PaginationState::Exhausted`] when the
//! control never shows up, a page of results never settles, or the click
//! ceiling is reached. Driver errors are not exhaustion: they abort the listing.

use crate::release_session;
use anyhow::Result;
use blogsheet_common::{Result as ScrapeResult, ScrapeError};
use blogsheet_config::{BrowserConfig, Selectors};
use blogsheet_drivers::{BrowserLauncher, BrowserSession, WaitOutcome};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    MoreAvailable,
    Exhausted(ExhaustedBy),
}

/// Why a listing stopped growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustedBy {
    /// The load-more control did not appear in time.
    ControlAbsent,
    /// A click never finished loading.
    SettleTimeout,
    /// The configured click ceiling was reached.
    ClickLimit,
}

/// Article links of a fully expanded listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub links: Vec<String>,
    pub clicks: usize,
    pub exhausted_by: ExhaustedBy,
}

pub struct Paginator {
    launcher: Arc<dyn BrowserLauncher>,
    selectors: Selectors,
    load_more_timeout: Duration,
    settle_timeout: Duration,
    max_clicks: usize,
}

impl Paginator {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        selectors: Selectors,
        browser: &BrowserConfig,
    ) -> Self {
        Self {
            launcher,
            selectors,
            load_more_timeout: browser.load_more_timeout(),
            settle_timeout: browser.settle_timeout(),
            max_clicks: browser.max_load_more_clicks,
        }
    }

    /// Expand the listing at `category_url` and return every article link on it.
    pub async fn collect_links(&self, category_url: &str) -> ScrapeResult<Listing> {
        let listing_error = |e: anyhow::Error| ScrapeError::Listing {
            url: category_url.to_string(),
            message: format!("{e:#}"),
        };

        let mut session = self.launcher.launch().await.map_err(listing_error)?;
        let outcome = self.expand(session.as_mut(), category_url).await;
        release_session(session, category_url).await;

        let listing = outcome.map_err(listing_error)?;
        tracing::info!(
            target: "scrape.paginate",
            url = category_url,
            links = listing.links.len(),
            clicks = listing.clicks,
            exhausted_by = ?listing.exhausted_by,
            "listing expanded"
        );
        Ok(listing)
    }

    async fn expand(&self, session: &mut dyn BrowserSession, url: &str) -> Result<Listing> {
        session.goto(url).await?;

        let mut clicks = 0;
        let mut state = PaginationState::MoreAvailable;
        let exhausted_by = loop {
            state = match state {
                PaginationState::Exhausted(reason) => break reason,
                PaginationState::MoreAvailable => self.advance(session, &mut clicks).await?,
            };
        };

        let links = session.hrefs(&self.selectors.article_link).await?;
        Ok(Listing {
            links,
            clicks,
            exhausted_by,
        })
    }

    /// One transition out of `MoreAvailable`.
    async fn advance(
        &self,
        session: &mut dyn BrowserSession,
        clicks: &mut usize,
    ) -> Result<PaginationState> {
        if *clicks >= self.max_clicks {
            return Ok(PaginationState::Exhausted(ExhaustedBy::ClickLimit));
        }

        let s = &self.selectors;
        if session.wait_for(&s.load_more, self.load_more_timeout).await? == WaitOutcome::TimedOut {
            return Ok(PaginationState::Exhausted(ExhaustedBy::ControlAbsent));
        }
        session.click(&s.load_more).await?;
        *clicks += 1;
        tracing::debug!(target: "scrape.paginate", clicks = *clicks, "load more clicked");

        Ok(
            match session
                .wait_until_gone(&s.load_more_busy, self.settle_timeout)
                .await?
            {
                WaitOutcome::Ready => PaginationState::MoreAvailable,
                WaitOutcome::TimedOut => PaginationState::Exhausted(ExhaustedBy::SettleTimeout),
            },
        )
    }
}
