//! Storage abstractions for job offer persistence.
//!
//! The pipeline needs two things from a store: the set of links it already
//! holds (read once per run) and an upsert of new offers keyed by link.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Scraper configuration
//! └── jobs.json             # Stored job offers
//! ```

pub mod local;

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{JobOffer, JobSource};

// Re-export for convenience
pub use local::LocalRecordStore;

/// On-disk document holding every stored offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredJobs {
    /// ISO 8601 timestamp of last update
    pub updated_at: DateTime<Utc>,
    /// Total offer count
    pub count: usize,
    /// The offers, in insertion order
    pub jobs: Vec<JobOffer>,
}

impl StoredJobs {
    pub fn new(jobs: Vec<JobOffer>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: jobs.len(),
            jobs,
        }
    }
}

/// Counts describing the contents of a store.
#[derive(Debug, Clone, Default)]
pub struct StoreSummary {
    pub total: usize,
    pub by_source: BTreeMap<JobSource, usize>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Trait for job record backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Links of every offer already stored.
    async fn known_links(&self) -> Result<HashSet<String>>;

    /// Insert or replace offers by link, all or nothing.
    async fn persist(&self, offers: &[JobOffer]) -> Result<()>;
}
