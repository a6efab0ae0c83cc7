//! Article detail extraction.

use crate::release_session;
use anyhow::Result;
use blogsheet_common::{ArticleRecord, Extraction};
use blogsheet_config::Selectors;
use blogsheet_drivers::{BrowserLauncher, BrowserSession};
use std::sync::Arc;

/// Leading integer of the first whitespace-separated token, 0 when absent.
///
/// ```
/// use blogsheet_web::extract::parse_read_time;
///
/// assert_eq!(parse_read_time("5 min"), 5);
/// assert_eq!(parse_read_time("min"), 0);
/// ```
pub fn parse_read_time(text: &str) -> u32 {
    let Some(token) = text.split_whitespace().next() else {
        return 0;
    };
    let digits = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(token, |(end, _)| &token[..end]);
    digits.parse().unwrap_or(0)
}

/// Reads one article page into an [`ArticleRecord`].
pub struct DetailExtractor {
    launcher: Arc<dyn BrowserLauncher>,
    selectors: Selectors,
}

impl DetailExtractor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, selectors: Selectors) -> Self {
        Self {
            launcher,
            selectors,
        }
    }

    /// Never fails: any launch, navigation or selector problem degrades to
    /// the sentinel record. The session is closed before returning.
    pub async fn extract(&self, url: &str) -> Extraction {
        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => return degrade(url, format!("browser launch failed: {e:#}")),
        };
        let read = self.read(session.as_mut(), url).await;
        release_session(session, url).await;

        match read {
            Ok(record) => {
                tracing::debug!(
                    target: "scrape.extract",
                    url,
                    title = %record.title,
                    "article read"
                );
                Extraction::Ok(record)
            }
            Err(e) => degrade(url, format!("{e:#}")),
        }
    }

    async fn read(&self, session: &mut dyn BrowserSession, url: &str) -> Result<ArticleRecord> {
        session.goto(url).await?;
        let s = &self.selectors;
        let title = session.text(&s.title).await?;
        let category = session.text(&s.category).await?;
        let read_time = session.text(&s.read_time).await?;
        let author = session.text(&s.author).await?;
        Ok(ArticleRecord {
            title,
            category,
            read_time_minutes: parse_read_time(&read_time),
            author,
        })
    }
}

fn degrade(url: &str, cause: String) -> Extraction {
    tracing::warn!(
        target: "scrape.extract",
        url,
        cause = %cause,
        "article degraded to placeholder"
    );
    Extraction::degraded(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, FakeSite};
    use blogsheet_common::SENTINEL_TITLE;

    const URL: &str = "https://blog.test/pymes/como-crecer";

    #[test]
    fn read_time_takes_leading_integer_of_first_token() {
        assert_eq!(parse_read_time("5 min"), 5);
        assert_eq!(parse_read_time("  12  minutos de lectura"), 12);
        assert_eq!(parse_read_time("12"), 12);
        assert_eq!(parse_read_time("5min"), 5);
        assert_eq!(parse_read_time("min 5"), 0);
        assert_eq!(parse_read_time(""), 0);
        assert_eq!(parse_read_time("-3 min"), 0);
    }

    #[tokio::test]
    async fn reads_all_fields() {
        let site = FakeSite::default().with_page(
            URL,
            FakePage::article(" Cómo crecer ", "Pymes", "7 min de lectura", "Ana"),
        );
        let extractor = DetailExtractor::new(site.launcher(), Selectors::default());

        let extraction = extractor.extract(URL).await;
        assert_eq!(
            extraction,
            Extraction::Ok(ArticleRecord {
                title: "Cómo crecer".into(),
                category: "Pymes".into(),
                read_time_minutes: 7,
                author: "Ana".into(),
            })
        );
        assert_eq!(site.launches(), 1);
        assert_eq!(site.closes(), 1);
    }

    #[tokio::test]
    async fn missing_selector_degrades_and_closes() {
        let mut page = FakePage::article("T", "C", "3 min", "A");
        page.texts.remove(&Selectors::default().author);
        let site = FakeSite::default().with_page(URL, page);
        let extractor = DetailExtractor::new(site.launcher(), Selectors::default());

        let extraction = extractor.extract(URL).await;
        assert!(extraction.is_degraded());
        assert_eq!(extraction.record().title, SENTINEL_TITLE);
        assert_eq!(site.closes(), 1);
    }

    #[tokio::test]
    async fn page_without_any_field_yields_exact_sentinel() {
        let site = FakeSite::default().with_page(URL, FakePage::default());
        let extractor = DetailExtractor::new(site.launcher(), Selectors::default());

        let extraction = extractor.extract(URL).await;
        assert!(extraction.is_degraded());
        let record = extraction.into_record();
        assert_eq!(record, ArticleRecord::sentinel());
        assert_eq!(record.read_time_minutes, 0);
        assert_eq!(site.visited(), [URL]);
        assert_eq!(site.closes(), 1);
    }

    #[tokio::test]
    async fn navigation_failure_degrades_and_closes() {
        let site = FakeSite::default();
        let extractor = DetailExtractor::new(site.launcher(), Selectors::default());

        let extraction = extractor.extract(URL).await;
        assert_eq!(extraction.into_record(), ArticleRecord::sentinel());
        assert_eq!(site.launches(), 1);
        assert_eq!(site.closes(), 1);
    }

    #[tokio::test]
    async fn launch_failure_degrades() {
        let site = FakeSite::default().failing_launch();
        let extractor = DetailExtractor::new(site.launcher(), Selectors::default());

        match extractor.extract(URL).await {
            Extraction::Degraded { cause, .. } => assert!(cause.contains("launch")),
            other => panic!("expected degraded extraction, got {other:?}"),
        }
        assert_eq!(site.closes(), 0);
    }
}
