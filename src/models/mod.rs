// src/models/mod.rs

//! Domain models for the job scraper.
//!
//! Raw postings flow in from the scrapers, normalized candidates come back
//! from the normalizer, and canonical `JobOffer`s are what gets stored.

mod config;
mod criteria;
mod normalized;
mod offer;
mod progress;
mod raw;
mod source;

// Re-export all public types
pub use config::{
    Config, LoggingConfig, NormalizerConfig, ScraperConfig, SiteSelectors, SitesConfig,
    StorageConfig,
};
pub use criteria::{JobSearchCriteria, Seniority};
pub use normalized::{ExperienceInput, NormalizedJobData, SalaryBag, SalaryInput};
pub use offer::{GrossNet, JobOffer, SalaryInfo, SalaryPeriod, YearsExperience};
pub use progress::{Activity, ScrapingProgress, ScrapingResult};
pub use raw::RawJobOffer;
pub use source::JobSource;
