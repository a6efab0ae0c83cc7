//! Scripted in-memory browser for unit tests.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use blogsheet_config::Selectors;
use blogsheet_drivers::{BrowserLauncher, BrowserSession, WaitOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a page's load-more control behaves.
#[derive(Debug, Clone, Default)]
pub struct LoadMore {
    /// Clicks accepted before the control disappears.
    pub rounds: usize,
    /// After this many clicks the busy marker never clears.
    pub stuck_after: Option<usize>,
    /// Clicking fails with a driver error.
    pub click_error: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub texts: HashMap<String, String>,
    pub links: HashMap<String, Vec<String>>,
    pub load_more: LoadMore,
}

impl FakePage {
    pub fn article(title: &str, category: &str, read_time: &str, author: &str) -> Self {
        let s = Selectors::default();
        let mut texts = HashMap::new();
        texts.insert(s.title, title.to_string());
        texts.insert(s.category, category.to_string());
        texts.insert(s.read_time, read_time.to_string());
        texts.insert(s.author, author.to_string());
        Self {
            texts,
            ..Self::default()
        }
    }

    pub fn listing(links: &[&str], load_more: LoadMore) -> Self {
        let mut page = Self {
            load_more,
            ..Self::default()
        };
        page.links.insert(
            Selectors::default().article_link,
            links.iter().map(|l| l.to_string()).collect(),
        );
        page
    }

    pub fn navigation(links: &[&str]) -> Self {
        let mut page = Self::default();
        page.links.insert(
            Selectors::default().category_link,
            links.iter().map(|l| l.to_string()).collect(),
        );
        page
    }
}

#[derive(Default)]
struct SiteState {
    pages: HashMap<String, FakePage>,
    fail_launch: bool,
    launches: usize,
    closes: usize,
    visited: Vec<String>,
}

/// A fake site: URL to page map plus session bookkeeping.
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn with_page(self, url: &str, page: FakePage) -> Self {
        self.lock().pages.insert(url.to_string(), page);
        self
    }

    pub fn failing_launch(self) -> Self {
        self.lock().fail_launch = true;
        self
    }

    pub fn launcher(&self) -> Arc<dyn BrowserLauncher> {
        Arc::new(self.clone())
    }

    pub fn launches(&self) -> usize {
        self.lock().launches
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl BrowserLauncher for FakeSite {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let mut state = self.lock();
        if state.fail_launch {
            bail!("browser binary not found");
        }
        state.launches += 1;
        Ok(Box::new(FakeSession {
            site: self.clone(),
            page: None,
            clicks: Mutex::new(0),
            selectors: Selectors::default(),
        }))
    }
}

struct FakeSession {
    site: FakeSite,
    page: Option<FakePage>,
    clicks: Mutex<usize>,
    selectors: Selectors,
}

impl FakeSession {
    fn page(&self) -> Result<&FakePage> {
        self.page.as_ref().ok_or_else(|| anyhow!("no page loaded"))
    }

    fn clicks(&self) -> usize {
        *self.clicks.lock().unwrap()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let mut state = self.site.lock();
        state.visited.push(url.to_string());
        match state.pages.get(url) {
            Some(page) => {
                self.page = Some(page.clone());
                Ok(())
            }
            None => bail!("net::ERR_NAME_NOT_RESOLVED at {url}"),
        }
    }

    async fn text(&self, selector: &str) -> Result<String> {
        self.page()?
            .texts
            .get(selector)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| anyhow!("no element matches {selector}"))
    }

    async fn hrefs(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self.page()?.links.get(selector).cloned().unwrap_or_default())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<WaitOutcome> {
        let page = self.page()?;
        let present = if selector == self.selectors.load_more {
            self.clicks() < page.load_more.rounds
        } else {
            page.texts.contains_key(selector) || page.links.contains_key(selector)
        };
        Ok(if present {
            WaitOutcome::Ready
        } else {
            WaitOutcome::TimedOut
        })
    }

    async fn wait_until_gone(&self, _selector: &str, _timeout: Duration) -> Result<WaitOutcome> {
        let stuck = self.page()?.load_more.stuck_after == Some(self.clicks());
        Ok(if stuck {
            WaitOutcome::TimedOut
        } else {
            WaitOutcome::Ready
        })
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if self.page()?.load_more.click_error {
            bail!("element click intercepted: {selector}");
        }
        *self.clicks.lock().unwrap() += 1;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.site.lock().closes += 1;
        Ok(())
    }
}
