//! Ingestion pipeline.
//!
//! - `ingest`: the orchestrated run over every source
//! - `mapping`: normalizer output to canonical offers
//! - `dedup`: exact and fuzzy duplicate removal

pub mod dedup;
pub mod ingest;
pub mod mapping;

pub use dedup::{DuplicateDetector, jaccard_similarity};
pub use ingest::{IngestPipeline, ItemOutcome, SourceOutcome, SourceRun};
pub use mapping::map_to_job_offer;
