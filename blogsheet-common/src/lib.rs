//! Common types and utilities shared across blogsheet crates.
//!
//! This crate defines the scraped-article data model, the shared error type,
//! and observability helpers used throughout the workspace. It stays
//! dependency-light so every crate can depend on it.
//!
//! # Overview
//!
//! - [`ArticleRecord`]: one scraped article, always fully populated
//! - [`Extraction`]: extractor outcome, either a real record or a degraded sentinel
//! - [`CategorySlug`] and [`CategorySelector`]: which site sections to scrape
//! - [`SheetRow`]: fixed column projection written to the spreadsheet
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ScrapeError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use blogsheet_common::{CategorySelector, SheetRow, ArticleRecord};
//!
//! let selector: CategorySelector = "all".parse().unwrap();
//! assert!(selector.is_all());
//!
//! let row = SheetRow::from(&ArticleRecord::sentinel());
//! assert_eq!(row.cells()[2], "0");
//! ```

pub mod model;
pub mod observability;

pub use model::{
    ArticleRecord, CategorySelector, CategorySlug, Extraction, SheetRow, SENTINEL_AUTHOR,
    SENTINEL_CATEGORY, SENTINEL_TITLE,
};

/// Error types used across the blogsheet system.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// Reading the site navigation failed.
    #[error("Category discovery failed for {url}: {message}")]
    Discovery { url: String, message: String },

    /// Expanding or reading a category listing failed.
    #[error("Listing failed for {url}: {message}")]
    Listing { url: String, message: String },

    /// User input could not be turned into a category selector.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
}

/// Convenient alias for results that use [`ScrapeError`].
pub type Result<T> = std::result::Result<T, ScrapeError>;
