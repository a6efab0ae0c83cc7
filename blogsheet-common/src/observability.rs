//! Tracing setup shared by the `scrape` and `blogsheet-server` binaries.
//!
//! [`init_logging`] installs one global subscriber that writes to a daily
//! rolling file and, optionally, mirrors every event to `stderr`. The scrape
//! CLI mirrors to `stderr` so the server, which runs it as a child process,
//! can relay its lines. Only the first call installs anything; later calls
//! return the path chosen by the first.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Keeps the non-blocking file writer flushing for the life of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "BLOGSHEET_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Component name; also the log file prefix.
    pub app_name: &'static str,
    /// Log directory. Falls back to `BLOGSHEET_LOG_DIR`, then `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "blogsheet",
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global subscriber and return today's log file.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_FILE.get() {
        return Ok(path.clone());
    }

    let dir = log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let prefix = format!("{}.log", config.app_name);
    // The daily appender names files `<prefix>.<UTC date>`.
    let file = dir.join(format!("{prefix}.{}", Utc::now().format("%Y-%m-%d")));
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &prefix));
    let _ = FILE_GUARD.set(guard);

    let mut layers = vec![layer(config.format, writer)];
    if config.emit_stderr {
        layers.push(layer(config.format, std::io::stderr));
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    let _ = LOG_FILE.set(file.clone());
    Ok(file)
}

fn layer<W>(format: LogFormat, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

fn log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from));
    let home = std::env::var_os("HOME").map(PathBuf::from);

    match (configured, home) {
        (Some(dir), Some(home)) => match dir.strip_prefix("~") {
            Ok(rest) => home.join(rest),
            Err(_) => dir,
        },
        (Some(dir), None) => dir,
        (None, Some(home)) => home.join(".local/share").join(app_name),
        (None, None) => PathBuf::from(app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_and_tilde_expands() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(log_dir("scrape", Some(tmp.path())), tmp.path());

        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                log_dir("scrape", Some(Path::new("~/logs"))),
                PathBuf::from(home).join("logs")
            );
        }
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn init_returns_the_daily_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = init_logging(LogConfig {
            app_name: "blogsheet-test",
            log_dir: Some(tmp.path().to_path_buf()),
            emit_stderr: false,
            ..LogConfig::default()
        })
        .unwrap();
        assert_eq!(path.parent(), Some(tmp.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("blogsheet-test.log."));

        // Second call keeps the first subscriber and path.
        let again = init_logging(LogConfig::default()).unwrap();
        assert_eq!(again, path);
    }
}
