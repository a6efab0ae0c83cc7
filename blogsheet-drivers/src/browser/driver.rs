use crate::browser::{launch::build_capabilities, page::FantocciniSession};
use crate::browser::{BrowserLauncher, BrowserSession};
use anyhow::{Context, Result};
use async_trait::async_trait;
use blogsheet_config::BrowserConfig;
use fantoccini::ClientBuilder;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

/// Opens a fresh WebDriver session per [`BrowserLauncher::launch`] call.
///
/// Expects a running WebDriver service (chromedriver on
/// `http://localhost:9515` by default, see `browser.webdriver_url`).
#[derive(Debug, Clone)]
pub struct FantocciniLauncher {
    webdriver_url: String,
    capabilities: Capabilities,
    navigation_timeout: Duration,
}

impl FantocciniLauncher {
    pub fn from_config(cfg: &BrowserConfig) -> Self {
        Self {
            webdriver_url: cfg.webdriver_url.clone(),
            capabilities: build_capabilities(cfg),
            navigation_timeout: cfg.navigation_timeout(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FantocciniLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        tracing::debug!(
            target: "browser.session",
            webdriver = %self.webdriver_url,
            "launching browser session"
        );
        let client = ClientBuilder::native()
            .capabilities(self.capabilities.clone())
            .connect(&self.webdriver_url)
            .await
            .with_context(|| format!("connect to WebDriver at {}", self.webdriver_url))?;

        Ok(Box::new(FantocciniSession::new(
            client,
            self.navigation_timeout,
        )))
    }
}
