//! Configuration for the scraper CLI and the trigger server.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. `Default` impls of every section in [`schema`];
//! 2. YAML files and inline snippets, in attachment order;
//! 3. `BLOGSHEET__SECTION__KEY` variables, e.g. `BLOGSHEET__SERVER__PORT`;
//! 4. the flat deployment variables listed in [`FLAT_VARS`] plus `PORT`.
//!
//! String values may contain `${VAR}` placeholders; they are resolved once
//! everything is merged. Unknown variables are left untouched.
use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde_json::Value;

pub mod schema;

pub use schema::{
    BlogsheetConfig, BrowserConfig, CredentialsConfig, EnvironmentMode, LogSettings,
    NotifyConfig, ScrapeConfig, Selectors, ServerConfig, SheetsConfig, SiteConfig,
};

/// Flat variable mapped onto a config key.
pub struct FlatVar {
    /// Names checked in order; the first non-empty one is used.
    pub names: &'static [&'static str],
    pub key: &'static str,
    lowercase: bool,
}

const fn flat(names: &'static [&'static str], key: &'static str) -> FlatVar {
    FlatVar {
        names,
        key,
        lowercase: false,
    }
}

pub const FLAT_VARS: &[FlatVar] = &[
    flat(&["EMAIL"], "notify.email"),
    flat(&["SPREADSHEET_ID"], "sheets.spreadsheet_id"),
    flat(&["CREDENTIALS_PATH"], "sheets.credentials.path"),
    flat(
        &["BROWSER_EXECUTABLE_PATH", "PUPPETEER_EXECUTABLE_PATH"],
        "browser.executable_path",
    ),
    flat(&["WEBDRIVER_URL"], "browser.webdriver_url"),
    FlatVar {
        names: &["APP_ENV"],
        key: "sheets.credentials.mode",
        lowercase: true,
    },
];

/// Passes of placeholder expansion before giving up on self-referencing values.
const EXPANSION_PASSES: usize = 8;

impl FlatVar {
    fn value(&self) -> Option<String> {
        let raw = self.names.iter().find_map(|name| env_value(name))?;
        Some(if self.lowercase {
            raw.to_ascii_lowercase()
        } else {
            raw
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn port_override() -> Result<Option<i64>, ConfigError> {
    let Some(raw) = env_value("PORT") else {
        return Ok(None);
    };
    raw.parse::<u16>()
        .map(|port| Some(i64::from(port)))
        .map_err(|e| ConfigError::Message(format!("invalid PORT {raw:?}: {e}")))
}

fn expand_str(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..EXPANSION_PASSES {
        let Ok(next) = shellexpand::env(&current) else {
            break;
        };
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current
}

fn expand_placeholders(value: Value) -> Value {
    match value {
        Value::String(s) if s.contains('$') => Value::String(expand_str(&s)),
        Value::Array(items) => items.into_iter().map(expand_placeholders).collect(),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, expand_placeholders(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Collects sources, then [`load`](Self::load)s them into a [`BlogsheetConfig`].
pub struct BlogsheetConfigLoader {
    sources: ConfigBuilder<DefaultState>,
}

impl Default for BlogsheetConfigLoader {
    fn default() -> Self {
        Self {
            sources: Config::builder(),
        }
    }
}

impl BlogsheetConfigLoader {
    /// ```
    /// use blogsheet_config::BlogsheetConfigLoader;
    ///
    /// let config = BlogsheetConfigLoader::new()
    ///     .with_yaml_str("server:\n  host: 127.0.0.1")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.server.host, "127.0.0.1");
    /// assert_eq!(config.scrape.articles_per_category, Some(1));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Required file; the format follows the extension.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add(File::from(path.as_ref()).required(true))
    }

    /// File that may be missing, for deployments configured purely through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add(File::from(path.as_ref()).required(false))
    }

    /// ```
    /// use blogsheet_config::{BlogsheetConfigLoader, EnvironmentMode};
    ///
    /// let cfg = BlogsheetConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// site:
    ///   base_url: "https://example.com/news"
    /// sheets:
    ///   spreadsheet_id: "abc123"
    ///   credentials:
    ///     mode: production
    /// scrape:
    ///   articles_per_category: null
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.site.category_url("pymes"), "https://example.com/news/pymes");
    /// assert_eq!(cfg.sheets.credentials.mode, EnvironmentMode::Production);
    /// assert_eq!(cfg.scrape.articles_per_category, None);
    /// ```
    pub fn with_yaml_str(self, yaml: &str) -> Self {
        self.add(File::from_str(yaml, FileFormat::Yaml))
    }

    fn add<S>(self, source: S) -> Self
    where
        S: config::Source + Send + Sync + 'static,
    {
        Self {
            sources: self.sources.add_source(source),
        }
    }

    pub fn load(self) -> Result<BlogsheetConfig, ConfigError> {
        let prefixed = Environment::with_prefix("BLOGSHEET")
            .separator("__")
            .try_parsing(true);
        let mut builder = self.sources.add_source(prefixed);

        for var in FLAT_VARS {
            builder = builder.set_override_option(var.key, var.value())?;
        }
        builder = builder.set_override_option("server.port", port_override()?)?;

        let merged: Value = builder.build()?.try_deserialize()?;
        serde_json::from_value(expand_placeholders(merged))
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}
