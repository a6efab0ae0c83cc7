//! End-to-end scrape of one or all categories.

use crate::normalize::Normalized;
use crate::{CategoryDiscoverer, DetailExtractor, Paginator};
use blogsheet_common::{ArticleRecord, CategorySelector, CategorySlug, Result};
use blogsheet_config::{BlogsheetConfig, SiteConfig};
use blogsheet_drivers::BrowserLauncher;
use std::sync::Arc;

/// Records gathered by one run, in category then listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub records: Vec<ArticleRecord>,
    /// How many of `records` are placeholders for unreadable articles.
    pub degraded: usize,
    pub categories: Vec<CategorySlug>,
}

pub struct Orchestrator {
    site: SiteConfig,
    discoverer: CategoryDiscoverer,
    paginator: Paginator,
    extractor: DetailExtractor,
    articles_per_category: Option<usize>,
}

impl Orchestrator {
    pub fn new(config: &BlogsheetConfig, launcher: Arc<dyn BrowserLauncher>) -> Self {
        let selectors = &config.site.selectors;
        Self {
            site: config.site.clone(),
            discoverer: CategoryDiscoverer::new(launcher.clone(), selectors.category_link.clone()),
            paginator: Paginator::new(launcher.clone(), selectors.clone(), &config.browser),
            extractor: DetailExtractor::new(launcher, selectors.clone()),
            articles_per_category: config.scrape.articles_per_category,
        }
    }

    /// Override the per-category article limit; `None` reads every link.
    pub fn with_article_limit(mut self, limit: Option<usize>) -> Self {
        self.articles_per_category = limit;
        self
    }

    pub async fn run(&self, selector: &CategorySelector) -> Result<ScrapeReport> {
        let categories = match selector {
            CategorySelector::All => self
                .discoverer
                .discover(&self.site.base_url)
                .await
                .inspect_err(|e| {
                    tracing::error!(target: "scrape.run", error = %e, "category discovery failed")
                })?,
            CategorySelector::One(slug) => vec![slug.clone()],
        };
        tracing::info!(
            target: "scrape.run",
            selector = %selector,
            categories = categories.len(),
            limit = ?self.articles_per_category,
            "scrape started"
        );

        let mut report = ScrapeReport::default();
        for slug in &categories {
            let url = self.site.category_url(slug.as_str());
            let listing = self
                .paginator
                .collect_links(&url)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        target: "scrape.run",
                        category = %slug,
                        error = %e,
                        "listing failed"
                    )
                })?;

            let take = self.articles_per_category.unwrap_or(usize::MAX);
            for link in listing.links.iter().take(take) {
                let extraction = self.extractor.extract(link).await;
                if extraction.is_degraded() {
                    report.degraded += 1;
                }
                report.records.push(extraction.into_record().normalized());
            }
        }
        report.categories = categories;

        tracing::info!(
            target: "scrape.run",
            records = report.records.len(),
            degraded = report.degraded,
            "scrape finished"
        );
        Ok(report)
    }
}
