// src/scrapers/mod.rs

//! Source scrapers.
//!
//! Each job board gets one `SourceScraper`. The pipeline only sees the trait,
//! so adding a board means adding a `JobSource` variant and an
//! implementation here.

pub mod html;
pub mod justjoin;
pub mod nofluffjobs;
pub mod page;
pub mod pracuj;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, JobSearchCriteria, JobSource, RawJobOffer};
use crate::utils::http::create_async_client;

pub use justjoin::JustJoinScraper;
pub use nofluffjobs::NoFluffJobsScraper;
pub use pracuj::PracujScraper;

/// Fetches raw postings from one job board.
#[async_trait]
pub trait SourceScraper: Send + Sync {
    /// The board this scraper reads.
    fn source(&self) -> JobSource;

    /// Raw postings matching the criteria, at most the per-site cap per title.
    async fn scrape(&self, criteria: &JobSearchCriteria) -> Result<Vec<RawJobOffer>>;
}

/// Build one scraper per configured source, in configured order.
pub fn build_scrapers(config: &Config) -> Result<Vec<Arc<dyn SourceScraper>>> {
    let client = create_async_client(&config.scraper)?;

    config
        .scraper
        .sources
        .iter()
        .map(|&source| build_scraper(source, client.clone(), config))
        .collect()
}

fn build_scraper(
    source: JobSource,
    client: reqwest::Client,
    config: &Config,
) -> Result<Arc<dyn SourceScraper>> {
    let site = config.sites.get(source);
    let scraper: Arc<dyn SourceScraper> = match source {
        JobSource::JustJoin => Arc::new(JustJoinScraper::new(client, &config.scraper, site)?),
        JobSource::NoFluffJobs => {
            Arc::new(NoFluffJobsScraper::new(client, &config.scraper, site)?)
        }
        JobSource::Pracuj => Arc::new(PracujScraper::new(client, &config.scraper, site)?),
    };
    Ok(scraper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::SitesConfig;
    use crate::scrapers::page::PageScraper;
    use crate::utils::http::RetryPolicy;

    #[test]
    fn test_build_scrapers_follows_config_order() {
        let mut config = Config::default();
        config.scraper.sources = vec![JobSource::Pracuj, JobSource::JustJoin];

        let scrapers = build_scrapers(&config).unwrap();
        let sources: Vec<_> = scrapers.iter().map(|s| s.source()).collect();
        assert_eq!(sources, vec![JobSource::Pracuj, JobSource::JustJoin]);
    }

    #[test]
    fn test_build_scrapers_rejects_bad_selector() {
        let mut config = Config::default();
        config.sites.pracuj.card_selector = "[[".into();

        assert!(matches!(
            build_scrapers(&config),
            Err(AppError::Selector { .. })
        ));
    }

    #[tokio::test]
    async fn test_every_title_failing_fails_the_source() {
        let sites = SitesConfig::default();
        let page = PageScraper::new(
            JobSource::Pracuj,
            reqwest::Client::new(),
            &Default::default(),
            &sites.pracuj,
        )
        .unwrap()
        .with_policy(RetryPolicy::none());

        let criteria = JobSearchCriteria::new(["Rust", "Go"]);
        let err = page
            .scrape_titles(&criteria, |title| {
                Err(AppError::validation(format!("no url for {}", title)))
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Scrape {
                site: JobSource::Pracuj,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_no_titles_is_empty_success() {
        let sites = SitesConfig::default();
        let page = PageScraper::new(
            JobSource::JustJoin,
            reqwest::Client::new(),
            &Default::default(),
            &sites.justjoin,
        )
        .unwrap();

        let criteria = JobSearchCriteria::new(["   "]);
        let offers = page
            .scrape_titles(&criteria, |_| Err(AppError::validation("unreachable")))
            .await
            .unwrap();
        assert!(offers.is_empty());
    }
}
