use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod driver;
pub mod launch;
pub mod page;

/// Result of a bounded wait. A timeout is an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// One open browser page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate and wait until the DOM is ready.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Trimmed text of the first element matching `selector`; errors when nothing matches.
    async fn text(&self, selector: &str) -> Result<String>;

    /// Resolved `href` of every element matching `selector`, in document order.
    async fn hrefs(&self, selector: &str) -> Result<Vec<String>>;

    /// Wait until an element matching `selector` exists.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome>;

    /// Wait until no visible element matches `selector`.
    async fn wait_until_gone(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Release the page and its browser.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
