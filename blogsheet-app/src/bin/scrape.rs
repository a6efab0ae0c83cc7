//! Scrape one category (or `all`) and write the articles to the spreadsheet.

use anyhow::Result;
use blogsheet_app::bootstrap;
use blogsheet_common::CategorySelector;
use blogsheet_drivers::browser::driver::FantocciniLauncher;
use blogsheet_web::Orchestrator;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "scrape", version, about = "Scrape blog articles into a Google spreadsheet")]
struct Cli {
    /// Category slug, or `all` for every category in the site navigation
    category: String,

    /// Print the records as JSON instead of writing the spreadsheet
    #[arg(long)]
    dry_run: bool,

    /// Read every article of each listing instead of the configured limit
    #[arg(long)]
    all_articles: bool,

    /// YAML configuration file (default: ./blogsheet.yaml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.exit_code() == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(target: "scrape", error = %format!("{e:#}"), "scrape failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let selector: CategorySelector = cli.category.parse()?;
    let config = bootstrap::load_config(cli.config.as_deref())?;
    let log_path = bootstrap::init_logging("scrape", &config.log)?;
    tracing::debug!(target: "scrape", log = %log_path.display(), "logging initialised");

    // Resolve sheet credentials before spending minutes in the browser.
    let writer = if cli.dry_run {
        None
    } else {
        Some(blogsheet_sheets::connect(&config.sheets)?)
    };

    let launcher = Arc::new(FantocciniLauncher::from_config(&config.browser));
    let mut orchestrator = Orchestrator::new(&config, launcher);
    if cli.all_articles {
        orchestrator = orchestrator.with_article_limit(None);
    }
    let report = orchestrator.run(&selector).await?;

    match writer {
        Some(writer) => {
            writer.persist(&report.records).await?;
            tracing::info!(
                target: "scrape",
                records = report.records.len(),
                degraded = report.degraded,
                "news details have been written to the Google Sheet"
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&report.records)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["scrape", "pymes", "--dry-run", "--all-articles"]).unwrap();
        assert_eq!(cli.category, "pymes");
        assert!(cli.dry_run);
        assert!(cli.all_articles);
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["scrape", "--config", "site.yaml", "--", "all"]).unwrap();
        assert_eq!(cli.category, "all");
        assert_eq!(cli.config, Some(PathBuf::from("site.yaml")));
    }

    #[test]
    fn category_is_required() {
        let err = Cli::try_parse_from(["scrape"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }
}
