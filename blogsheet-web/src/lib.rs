//! Scraping pipeline for a blog with paginated category listings.
//!
//! - [`discover`]: category slugs from the site navigation
//! - [`paginate`]: expands a category listing and collects article links
//! - [`extract`]: reads one article page, degrading to a placeholder on failure
//! - [`normalize`]: strips diacritics from scraped text
//! - [`orchestrate`]: runs the above for one or all categories
//!
//! Every component opens its own browser session through a
//! [`BrowserLauncher`](blogsheet_drivers::BrowserLauncher) and closes it
//! before returning.

use blogsheet_drivers::BrowserSession;

pub mod discover;
pub mod extract;
pub mod normalize;
pub mod orchestrate;
pub mod paginate;

#[cfg(test)]
pub(crate) mod testing;

pub use discover::CategoryDiscoverer;
pub use extract::DetailExtractor;
pub use orchestrate::{Orchestrator, ScrapeReport};
pub use paginate::{ExhaustedBy, Listing, Paginator};

/// Close a session, logging (not propagating) a failure to do so.
pub(crate) async fn release_session(session: Box<dyn BrowserSession>, url: &str) {
    if let Err(e) = session.close().await {
        tracing::warn!(
            target: "browser.session",
            url,
            error = %format!("{e:#}"),
            "failed to close browser session"
        );
    }
}
