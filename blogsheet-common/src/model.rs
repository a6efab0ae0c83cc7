//! Scraped-article data model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ScrapeError;

pub const SENTINEL_TITLE: &str = "No title found";
pub const SENTINEL_CATEGORY: &str = "No category found";
pub const SENTINEL_AUTHOR: &str = "No author found";

/// Metadata pulled from one article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub category: String,
    pub read_time_minutes: u32,
    pub author: String,
}

impl ArticleRecord {
    /// Placeholder substituted when an article page cannot be read.
    pub fn sentinel() -> Self {
        Self {
            title: SENTINEL_TITLE.to_string(),
            category: SENTINEL_CATEGORY.to_string(),
            read_time_minutes: 0,
            author: SENTINEL_AUTHOR.to_string(),
        }
    }

    /// Apply `f` to the three free-text fields, leaving the read time alone.
    pub fn map_text<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            title: f(&self.title),
            category: f(&self.category),
            read_time_minutes: self.read_time_minutes,
            author: f(&self.author),
        }
    }
}

/// Outcome of reading one article page.
///
/// `Degraded` keeps the batch going: it always carries the sentinel record,
/// so every processed link still yields exactly one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Ok(ArticleRecord),
    Degraded { record: ArticleRecord, cause: String },
}

impl Extraction {
    pub fn degraded(cause: impl Into<String>) -> Self {
        Self::Degraded {
            record: ArticleRecord::sentinel(),
            cause: cause.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn record(&self) -> &ArticleRecord {
        match self {
            Self::Ok(record) | Self::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> ArticleRecord {
        match self {
            Self::Ok(record) | Self::Degraded { record, .. } => record,
        }
    }
}

/// Identifier of a content section, e.g. `pymes` in `https://site/blog/pymes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategorySlug(String);

impl CategorySlug {
    pub fn new(raw: impl Into<String>) -> Result<Self, ScrapeError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::InvalidCategory("empty category".into()));
        }
        if trimmed.contains('/') {
            return Err(ScrapeError::InvalidCategory(format!(
                "category must be a single path segment: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derive a slug from the last non-empty path segment of a link.
    ///
    /// ```
    /// use blogsheet_common::CategorySlug;
    ///
    /// let slug = CategorySlug::from_href("https://example.com/blog/pymes/").unwrap();
    /// assert_eq!(slug.as_str(), "pymes");
    /// assert!(CategorySlug::from_href("https://example.com/").is_none());
    /// ```
    pub fn from_href(href: &str) -> Option<Self> {
        let without_query = href.split(['?', '#']).next().unwrap_or(href);
        let path = without_query
            .split_once("://")
            .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
            .unwrap_or(without_query);
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| Self(segment.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CategorySlug {
    type Error = ScrapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategorySlug> for String {
    fn from(value: CategorySlug) -> Self {
        value.0
    }
}

/// Which categories a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// Every category found in the site navigation.
    All,
    One(CategorySlug),
}

impl CategorySelector {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for CategorySelector {
    type Err = ScrapeError;

    /// `all` (or the legacy `todo`) selects every category, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todo") {
            return Ok(Self::All);
        }
        CategorySlug::new(trimmed).map(Self::One)
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::One(slug) => slug.fmt(f),
        }
    }
}

/// Spreadsheet projection of an [`ArticleRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow([String; 4]);

impl SheetRow {
    pub const HEADER: [&'static str; 4] = ["Title", "Category", "ReadTime", "Author"];

    pub fn header() -> Self {
        Self(Self::HEADER.map(str::to_string))
    }

    pub fn cells(&self) -> &[String; 4] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0.into()
    }
}

impl From<&ArticleRecord> for SheetRow {
    fn from(record: &ArticleRecord) -> Self {
        Self([
            record.title.clone(),
            record.category.clone(),
            record.read_time_minutes.to_string(),
            record.author.clone(),
        ])
    }
}
