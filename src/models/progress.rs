//! Progress snapshots and the final run result.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::JobSource;

/// What the pipeline is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    Scraping,
    Normalizing,
    Saving,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Activity::Scraping => "Scraping job listings",
            Activity::Normalizing => "Normalizing job data",
            Activity::Saving => "Saving jobs",
        };
        f.write_str(label)
    }
}

/// Transient status snapshot sent to a progress sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapingProgress {
    /// Source being worked on; `None` once all sources are done
    pub source: Option<JobSource>,
    pub activity: Activity,
    pub processed: usize,
    pub found: usize,
    pub failed: usize,
}

/// Aggregate outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapingResult {
    pub total_found: usize,
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub saved_count: usize,
    pub persistence_failed: bool,
    /// Set when the run was cancelled before every item was handled
    pub cancelled: bool,
    /// Processed count for every source that completed (zero included)
    pub processed_by_source: BTreeMap<JobSource, usize>,
    pub failed_sources: Vec<JobSource>,
}

impl ScrapingResult {
    /// Whether anything at all was scraped.
    pub fn found_anything(&self) -> bool {
        self.total_found > 0
    }
}
