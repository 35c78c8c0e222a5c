// src/pipeline/ingest.rs

//! The ingestion run: scrape every source, normalize, map, deduplicate and
//! persist.
//!
//! Sources run concurrently up to `max_concurrent_sources`. A failing source
//! is recorded and the others carry on; a failing item is counted and the
//! source carries on. Counters are summed once every source has finished.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{
    Activity, Config, JobOffer, JobSearchCriteria, JobSource, RawJobOffer, ScrapingProgress,
    ScrapingResult,
};
use crate::normalizer::{JobNormalizer, OpenAiNormalizer};
use crate::pipeline::dedup::DuplicateDetector;
use crate::pipeline::mapping::map_to_job_offer;
use crate::progress::{NullProgressSink, ProgressSink};
use crate::scrapers::{SourceScraper, build_scrapers};
use crate::storage::RecordStore;

/// Default number of sources scraped at once.
pub const DEFAULT_MAX_CONCURRENT_SOURCES: usize = 3;

/// What happened to one raw posting.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Normalized and mapped into a canonical offer
    Mapped(JobOffer),
    /// Link already stored; never normalized
    Skipped,
    /// Normalizer gave up or errored, or mapping failed
    Failed,
}

/// Counts and offers from a source whose scrape returned.
#[derive(Debug, Default)]
pub struct SourceRun {
    pub found: usize,
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub offers: Vec<JobOffer>,
}

/// What happened to one source.
#[derive(Debug)]
pub enum SourceOutcome {
    /// Scrape returned; items may have been cut short by cancellation
    Completed(JobSource, SourceRun),
    /// Scrape failed as a whole
    Failed(JobSource, AppError),
    /// Cancelled before or during the scrape
    Cancelled(JobSource),
}

/// Running totals shared by the source workers for progress reports.
#[derive(Debug, Default)]
struct RunningCounts {
    found: AtomicUsize,
    processed: AtomicUsize,
    failed: AtomicUsize,
}

impl RunningCounts {
    fn snapshot(&self, source: Option<JobSource>, activity: Activity) -> ScrapingProgress {
        ScrapingProgress {
            source,
            activity,
            processed: self.processed.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Drives one ingestion run over a set of sources.
pub struct IngestPipeline {
    scrapers: Vec<Arc<dyn SourceScraper>>,
    normalizer: Arc<dyn JobNormalizer>,
    store: Arc<dyn RecordStore>,
    progress: Arc<dyn ProgressSink>,
    detector: DuplicateDetector,
    max_concurrent_sources: usize,
}

impl IngestPipeline {
    pub fn new(
        scrapers: Vec<Arc<dyn SourceScraper>>,
        normalizer: Arc<dyn JobNormalizer>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            scrapers,
            normalizer,
            store,
            progress: Arc::new(NullProgressSink),
            detector: DuplicateDetector::new(),
            max_concurrent_sources: DEFAULT_MAX_CONCURRENT_SOURCES,
        }
    }

    /// Wire the configured scrapers and the chat-completions normalizer.
    pub fn from_config(config: &Config, store: Arc<dyn RecordStore>) -> Result<Self> {
        let scrapers = build_scrapers(config)?;
        let normalizer = Arc::new(OpenAiNormalizer::new(&config.normalizer)?);
        Ok(Self::new(scrapers, normalizer, store)
            .with_max_concurrent_sources(config.scraper.max_concurrent_sources))
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_max_concurrent_sources(mut self, max: usize) -> Self {
        self.max_concurrent_sources = max.max(1);
        self
    }

    /// Run the whole pipeline.
    ///
    /// Fails only on invalid criteria or when the known links cannot be
    /// loaded; both happen before any scraping. Source, item and persistence
    /// failures are reported in the result. A cancelled run still
    /// deduplicates and saves what it collected and sets `cancelled`.
    pub async fn execute(
        &self,
        criteria: &JobSearchCriteria,
        cancel: CancellationToken,
    ) -> Result<ScrapingResult> {
        criteria.validate()?;

        let known = Arc::new(self.store.known_links().await?);
        log::info!(
            "Starting run over {} sources ({} known links)",
            self.scrapers.len(),
            known.len()
        );

        let counts = RunningCounts::default();
        let outcomes: Vec<SourceOutcome> = stream::iter(self.scrapers.iter())
            .map(|scraper| self.run_source(scraper.as_ref(), criteria, &known, &counts, &cancel))
            .buffered(self.max_concurrent_sources)
            .collect()
            .await;

        let (mut result, offers) = aggregate(outcomes);
        result.cancelled = cancel.is_cancelled();

        let before = offers.len();
        let unique = self.detector.remove_duplicates(offers);
        result.duplicates = before - unique.len();

        if !unique.is_empty() {
            self.progress
                .report(&counts.snapshot(None, Activity::Saving));
            match self.store.persist(&unique).await {
                Ok(()) => result.saved_count = unique.len(),
                Err(e) => {
                    log::error!("Failed to persist {} jobs: {}", unique.len(), e);
                    result.persistence_failed = true;
                }
            }
        }

        log::info!(
            "Run finished: {} found, {} processed, {} failed, {} skipped, {} duplicates, {} saved",
            result.total_found,
            result.processed,
            result.failed,
            result.skipped,
            result.duplicates,
            result.saved_count
        );
        Ok(result)
    }

    async fn run_source(
        &self,
        scraper: &dyn SourceScraper,
        criteria: &JobSearchCriteria,
        known: &HashSet<String>,
        counts: &RunningCounts,
        cancel: &CancellationToken,
    ) -> SourceOutcome {
        let source = scraper.source();
        if cancel.is_cancelled() {
            return SourceOutcome::Cancelled(source);
        }

        self.progress
            .report(&counts.snapshot(Some(source), Activity::Scraping));

        let scraped = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::warn!("Scraping {} cancelled", source);
                return SourceOutcome::Cancelled(source);
            }
            scraped = scraper.scrape(criteria) => scraped,
        };

        let raws = match scraped {
            Ok(raws) => raws,
            Err(e) => {
                log::error!("Source {} failed: {}", source, e);
                return SourceOutcome::Failed(source, e);
            }
        };

        let mut run = SourceRun {
            found: raws.len(),
            ..SourceRun::default()
        };
        counts.found.fetch_add(run.found, Ordering::Relaxed);
        log::info!("Found {} jobs from {}", run.found, source);

        for raw in &raws {
            if cancel.is_cancelled() {
                log::warn!(
                    "Run cancelled, abandoning {} unprocessed jobs from {}",
                    run.found - run.processed - run.failed - run.skipped,
                    source
                );
                break;
            }

            match self.process_item(raw, known, counts).await {
                ItemOutcome::Mapped(offer) => {
                    run.processed += 1;
                    counts.processed.fetch_add(1, Ordering::Relaxed);
                    run.offers.push(offer);
                }
                ItemOutcome::Skipped => run.skipped += 1,
                ItemOutcome::Failed => {
                    run.failed += 1;
                    counts.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        log::info!(
            "{}: {} processed, {} failed, {} skipped",
            source,
            run.processed,
            run.failed,
            run.skipped
        );
        SourceOutcome::Completed(source, run)
    }

    async fn process_item(
        &self,
        raw: &RawJobOffer,
        known: &HashSet<String>,
        counts: &RunningCounts,
    ) -> ItemOutcome {
        if known.contains(&raw.link) {
            log::debug!("Skipping known job: {}", raw.link);
            return ItemOutcome::Skipped;
        }

        self.progress
            .report(&counts.snapshot(Some(raw.source), Activity::Normalizing));

        let data = match self.normalizer.normalize(raw).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::warn!("Could not normalize job: {}", raw.link);
                return ItemOutcome::Failed;
            }
            Err(e) => {
                log::warn!("Normalizer failed for {}: {}", raw.link, e);
                return ItemOutcome::Failed;
            }
        };

        match map_to_job_offer(data, raw) {
            Ok(offer) => ItemOutcome::Mapped(offer),
            Err(e) => {
                log::warn!("Failed to map job {}: {}", raw.link, e);
                ItemOutcome::Failed
            }
        }
    }
}

/// Sum source outcomes in source order, returning the result and every offer.
fn aggregate(outcomes: Vec<SourceOutcome>) -> (ScrapingResult, Vec<JobOffer>) {
    let mut result = ScrapingResult::default();
    let mut offers = Vec::new();

    for outcome in outcomes {
        match outcome {
            SourceOutcome::Completed(source, run) => {
                result.total_found += run.found;
                result.processed += run.processed;
                result.failed += run.failed;
                result.skipped += run.skipped;
                result.processed_by_source.insert(source, run.processed);
                offers.extend(run.offers);
            }
            SourceOutcome::Failed(source, _) => result.failed_sources.push(source),
            SourceOutcome::Cancelled(_) => {}
        }
    }
    (result, offers)
}
