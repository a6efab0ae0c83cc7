//! Strongly typed configuration sections.
//!
//! Every section implements `Default`, so an empty YAML document (or no file
//! at all) yields a usable configuration.

use blogsheet_common::observability::LogFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogsheetConfig {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub scrape: ScrapeConfig,
    pub sheets: SheetsConfig,
    pub notify: NotifyConfig,
    pub server: ServerConfig,
    pub log: LogSettings,
}

/// The site being scraped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Blog root; category listings live at `{base_url}/{slug}`.
    pub base_url: String,
    pub selectors: Selectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://xepelin.com/blog".to_string(),
            selectors: Selectors::default(),
        }
    }
}

impl SiteConfig {
    /// Listing URL for one category.
    pub fn category_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), slug)
    }
}

/// CSS selectors tied to the target site's markup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Anchors in the category navigation menu.
    pub category_link: String,
    /// The "load more" button on a listing page.
    pub load_more: String,
    /// The same button while a page of results is loading.
    pub load_more_busy: String,
    /// Anchors pointing at individual articles on a listing page.
    pub article_link: String,
    pub title: String,
    pub category: String,
    pub read_time: String,
    pub author: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            category_link: r"a.relative.z-10.flex.cursor-pointer.items-center.py-\[11px\].text-xs.font-semibold.tracking-wide.text-xsky-700.transition.duration-300.hover\:text-xindigo-500.xl\:text-sm".to_string(),
            load_more: "button.inline-flex.cursor-pointer".to_string(),
            load_more_busy: "button.inline-flex.cursor-pointer.disabled".to_string(),
            article_link: "a.absolute.z-10.h-full.w-full".to_string(),
            title: "h1.ArticleSingle_title__0DNjm".to_string(),
            category: "a.text-primary-main".to_string(),
            read_time: "div.Text_body__snVk8".to_string(),
            author: "div.text-sm".to_string(),
        }
    }
}

/// WebDriver session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Running WebDriver service (chromedriver by default).
    pub webdriver_url: String,
    /// Browser binary override, passed as `goog:chromeOptions.binary`.
    pub executable_path: Option<PathBuf>,
    pub headless: bool,
    pub args: Vec<String>,
    pub navigation_timeout_secs: u64,
    /// How long to wait for the load-more control to appear.
    pub load_more_timeout_secs: u64,
    /// How long to wait for a clicked load-more control to stop being busy.
    pub settle_timeout_secs: u64,
    pub max_load_more_clicks: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            executable_path: None,
            headless: true,
            args: vec![
                "--disable-setuid-sandbox".to_string(),
                "--no-sandbox".to_string(),
                "--single-process".to_string(),
                "--no-zygote".to_string(),
            ],
            navigation_timeout_secs: 30,
            load_more_timeout_secs: 10,
            settle_timeout_secs: 10,
            max_load_more_clicks: 200,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn load_more_timeout(&self) -> Duration {
        Duration::from_secs(self.load_more_timeout_secs)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Articles read per category listing; `None` reads every link.
    pub articles_per_category: Option<usize>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            articles_per_category: Some(1),
        }
    }
}

/// Selects where service-account credentials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    /// Key file on disk at `credentials.path`.
    #[default]
    Development,
    /// Key JSON in the environment variable named by `credentials.env_var`.
    Production,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub mode: EnvironmentMode,
    pub path: PathBuf,
    pub env_var: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            mode: EnvironmentMode::Development,
            path: PathBuf::from("credentials.json"),
            env_var: "GOOGLE_CREDENTIALS".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    /// A1 range cleared and appended to on every run.
    pub range: String,
    pub api_base: String,
    pub credentials: CredentialsConfig,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: "Sheet1!A:D".to_string(),
            api_base: "https://sheets.googleapis.com/".to_string(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl SheetsConfig {
    /// Browser link to the target spreadsheet.
    pub fn spreadsheet_url(&self) -> Option<String> {
        self.spreadsheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://docs.google.com/spreadsheets/d/{id}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Address included in the webhook payload.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Scrape executable run per request; defaults to `scrape` next to the server binary.
    pub worker_program: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            worker_program: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: true,
            filter: "info".to_string(),
        }
    }
}
