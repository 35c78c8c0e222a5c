// src/scrapers/nofluffjobs.rs

//! nofluffjobs.com scraper.
//!
//! Listing cards carry the title, company and salary; the description and
//! requirements come from each posting's detail page.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{JobSearchCriteria, JobSource, RawJobOffer, ScraperConfig, SiteSelectors};
use crate::scrapers::SourceScraper;
use crate::scrapers::page::PageScraper;

pub struct NoFluffJobsScraper {
    page: PageScraper,
    search_url: Url,
}

impl NoFluffJobsScraper {
    pub fn new(client: Client, config: &ScraperConfig, site: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            page: PageScraper::new(JobSource::NoFluffJobs, client, config, site)?,
            search_url: Url::parse(&site.search_url)?,
        })
    }

    /// `?criteria=<title>&city=<a,b>&seniority=<x,y>`
    pub fn search_url(&self, title: &str, criteria: &JobSearchCriteria) -> String {
        let mut url = self.search_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("criteria", title);

            let locations = criteria.search_locations();
            if !locations.is_empty() {
                query.append_pair("city", &locations.join(","));
            }
            let seniorities = criteria.seniority_labels();
            if !seniorities.is_empty() {
                query.append_pair("seniority", &seniorities.join(","));
            }
        }
        url.to_string()
    }
}

#[async_trait]
impl SourceScraper for NoFluffJobsScraper {
    fn source(&self) -> JobSource {
        JobSource::NoFluffJobs
    }

    async fn scrape(&self, criteria: &JobSearchCriteria) -> Result<Vec<RawJobOffer>> {
        self.page
            .scrape_titles(criteria, |title| Ok(self.search_url(title, criteria)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Seniority, SitesConfig};

    fn scraper() -> NoFluffJobsScraper {
        let config = ScraperConfig::default();
        let sites = SitesConfig::default();
        NoFluffJobsScraper::new(Client::new(), &config, &sites.nofluffjobs).unwrap()
    }

    #[test]
    fn test_search_url_title_only() {
        let criteria = JobSearchCriteria::new(["Rust Developer"]);
        assert_eq!(
            scraper().search_url("Rust Developer", &criteria),
            "https://nofluffjobs.com/pl/jobs?criteria=Rust+Developer"
        );
    }

    #[test]
    fn test_search_url_with_filters() {
        let criteria = JobSearchCriteria {
            locations: Some(vec!["Warszawa".into(), "Remote".into()]),
            seniorities: Some(vec![Seniority::Mid, Seniority::Senior]),
            ..JobSearchCriteria::new(["Backend"])
        };
        assert_eq!(
            scraper().search_url("Backend", &criteria),
            "https://nofluffjobs.com/pl/jobs?criteria=Backend&city=Warszawa%2CRemote&seniority=mid%2Csenior"
        );
    }

    #[test]
    fn test_source() {
        assert_eq!(scraper().source(), JobSource::NoFluffJobs);
    }
}
