use crate::browser::{BrowserSession, WaitOutcome};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, Locator};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// [`BrowserSession`] over a live WebDriver client.
pub struct FantocciniSession {
    client: Client,
    navigation_timeout: Duration,
}

impl FantocciniSession {
    pub fn new(client: Client, navigation_timeout: Duration) -> Self {
        Self {
            client,
            navigation_timeout,
        }
    }

    /// True when no element matching `selector` is displayed.
    async fn all_hidden(&self, selector: &str) -> Result<bool> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        for element in elements {
            // An element detached between lookup and query counts as gone.
            match element.is_displayed().await {
                Ok(true) => return Ok(false),
                Ok(false) => {}
                Err(e) if is_detached(&e) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }
}

fn is_detached(err: &CmdError) -> bool {
    matches!(
        err,
        CmdError::Standard(e) if matches!(e.error, ErrorStatus::StaleElementReference)
    )
}

#[async_trait]
impl BrowserSession for FantocciniSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.navigation_timeout, self.client.goto(url)).await {
            Ok(navigated) => navigated.with_context(|| format!("navigate to {url}")),
            Err(_) => Err(anyhow!(
                "navigation to {url} timed out after {}s",
                self.navigation_timeout.as_secs()
            )),
        }
    }

    async fn text(&self, selector: &str) -> Result<String> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .with_context(|| format!("no element matches {selector}"))?;
        let text = element.text().await?;
        Ok(text.trim().to_string())
    }

    async fn hrefs(&self, selector: &str) -> Result<Vec<String>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let mut links = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(href) = element.prop("href").await? {
                links.push(href);
            }
        }
        Ok(links)
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(WaitOutcome::Ready),
            Err(CmdError::WaitTimeout) => Ok(WaitOutcome::TimedOut),
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_until_gone(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.all_hidden(selector).await? {
                return Ok(WaitOutcome::Ready);
            }
            if Instant::now() >= deadline {
                return Ok(WaitOutcome::TimedOut);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .with_context(|| format!("no clickable element matches {selector}"))?;
        element.click().await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::WebDriver;

    #[test]
    fn stale_elements_count_as_detached() {
        let stale = CmdError::Standard(WebDriver::new(
            ErrorStatus::StaleElementReference,
            "element is not attached to the page document",
        ));
        assert!(is_detached(&stale));

        let other = CmdError::Standard(WebDriver::new(
            ErrorStatus::NoSuchWindow,
            "window was closed",
        ));
        assert!(!is_detached(&other));
        assert!(!is_detached(&CmdError::WaitTimeout));
    }
}
