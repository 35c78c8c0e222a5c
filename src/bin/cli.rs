//! jobscraper CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use jobscraper::{
    error::{AppError, Result},
    models::{Config, JobSearchCriteria, ScrapingResult, Seniority},
    pipeline::IngestPipeline,
    progress::{ConsoleProgressSink, NullProgressSink, ProgressSink},
    storage::LocalRecordStore,
    utils::log as console,
};
use tokio_util::sync::CancellationToken;

/// jobscraper - Job Board Ingestion
#[derive(Parser, Debug)]
#[command(
    name = "jobscraper",
    version,
    about = "Scrapes job boards, normalizes postings and stores the unique ones"
)]
struct Cli {
    /// Path to storage directory containing config.toml and jobs.json
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape, normalize and store job offers
    Run {
        /// Job titles to search for, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        titles: Vec<String>,

        /// Locations to filter by, comma-separated
        #[arg(long, value_delimiter = ',')]
        locations: Vec<String>,

        /// Seniority levels (junior, mid, senior, lead), comma-separated
        #[arg(long, value_delimiter = ',')]
        seniority: Vec<String>,

        /// Only offers posted on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date_from: Option<DateTime<Utc>>,

        /// Maximum offers per site and title
        #[arg(long)]
        max: Option<u32>,
    },

    /// Validate configuration file
    Validate,

    /// Show stored job counts
    Info,
}

/// Initialize logging based on verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn parse_date(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Parse seniority labels, warning about and dropping unknown ones.
fn parse_seniorities(values: Vec<String>) -> Vec<Seniority> {
    non_empty(values)
        .into_iter()
        .filter_map(|value| match value.parse::<Seniority>() {
            Ok(level) => Some(level),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect()
}

fn print_result(result: &ScrapingResult) {
    let mut items = vec![
        ("Total found", result.total_found.to_string()),
        ("Processed", result.processed.to_string()),
        ("Failed", result.failed.to_string()),
        ("Skipped (already stored)", result.skipped.to_string()),
        ("Duplicates removed", result.duplicates.to_string()),
        ("Saved", result.saved_count.to_string()),
    ];
    for (source, count) in &result.processed_by_source {
        items.push(("Processed from", format!("{}: {}", source, count)));
    }
    if !result.failed_sources.is_empty() {
        let failed: Vec<String> = result.failed_sources.iter().map(|s| s.to_string()).collect();
        items.push(("Failed sources", failed.join(", ")));
    }
    console::summary("Scraping Results", &items);

    if result.cancelled {
        console::warn("Run was cancelled; results are partial");
    }
    if result.persistence_failed {
        console::error("Jobs could not be saved");
    } else if !result.found_anything() {
        console::warn("No jobs found. Check the search criteria or the site selectors.");
    } else {
        console::success("Scraping completed");
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Load configurations
    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    let level = if cli.quiet {
        "warn"
    } else {
        config.logging.level.as_str()
    };
    console::init(level);

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let store = Arc::new(LocalRecordStore::with_file(
        &cli.storage_dir,
        &config.storage.jobs_file,
    ));

    match cli.command {
        Command::Run {
            titles,
            locations,
            seniority,
            date_from,
            max,
        } => {
            config.validate()?;

            let locations = non_empty(locations);
            let seniorities = parse_seniorities(seniority);
            let criteria = JobSearchCriteria {
                titles: non_empty(titles),
                locations: (!locations.is_empty()).then_some(locations),
                seniorities: (!seniorities.is_empty()).then_some(seniorities),
                date_from,
                max_per_site: max,
            };

            let progress: Arc<dyn ProgressSink> = if cli.quiet || !config.logging.show_progress {
                Arc::new(NullProgressSink)
            } else {
                Arc::new(ConsoleProgressSink::new())
            };
            let pipeline = IngestPipeline::from_config(&config, store)?.with_progress(progress);

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Cancellation requested, finishing up...");
                    ctrl_c.cancel();
                }
            });

            console::header("jobscraper");
            let result = pipeline.execute(&criteria, cancel).await?;
            print_result(&result);

            if result.persistence_failed {
                return Err(AppError::storage("Failed to persist scraped jobs"));
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sources)", config.scraper.sources.len());

            match config.normalizer.resolve_api_key() {
                Ok(_) => log::info!("✓ Normalizer API key found"),
                Err(e) => log::warn!("{}", e),
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let summary = store.summary().await?;
            match summary.updated_at {
                Some(updated) => {
                    log::info!("Stored jobs: {}", summary.total);
                    for (source, count) in &summary.by_source {
                        log::info!("  {}: {}", source, count);
                    }
                    log::info!("Last updated: {}", updated);
                }
                None => log::info!("No jobs stored yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
