use anyhow::{Context, Result};
use blogsheet_common::observability::{self, LogConfig};
use blogsheet_config::{BlogsheetConfig, BlogsheetConfigLoader, LogSettings};
use std::path::{Path, PathBuf};

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "blogsheet.yaml";

/// Load `.env`, then the configuration (env wins over files).
pub fn load_config(explicit: Option<&Path>) -> Result<BlogsheetConfig> {
    dotenvy::dotenv().ok();

    let loader = BlogsheetConfigLoader::new();
    let loader = match explicit {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

pub fn init_logging(app_name: &'static str, settings: &LogSettings) -> Result<PathBuf> {
    observability::init_logging(LogConfig {
        app_name,
        log_dir: settings.dir.clone(),
        emit_stderr: settings.stderr,
        format: settings.format,
        default_filter: settings.filter.clone(),
    })
}

/// Path of another binary installed next to the running one.
pub fn sibling_binary(name: &str) -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    Ok(exe.with_file_name(format!("{name}{}", std::env::consts::EXE_SUFFIX)))
}
