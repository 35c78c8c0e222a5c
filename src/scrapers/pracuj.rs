// src/scrapers/pracuj.rs

//! pracuj.pl scraper. The link sits on the title anchor.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{JobSearchCriteria, JobSource, RawJobOffer, ScraperConfig, SiteSelectors};
use crate::scrapers::SourceScraper;
use crate::scrapers::page::PageScraper;

pub struct PracujScraper {
    page: PageScraper,
    search_url: Url,
}

impl PracujScraper {
    pub fn new(client: Client, config: &ScraperConfig, site: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            page: PageScraper::new(JobSource::Pracuj, client, config, site)?,
            search_url: Url::parse(&site.search_url)?,
        })
    }

    /// `?q=<title>&wp=<a;b>`. The board has no seniority filter.
    pub fn search_url(&self, title: &str, criteria: &JobSearchCriteria) -> String {
        let mut url = self.search_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", title);

            let locations = criteria.search_locations();
            if !locations.is_empty() {
                query.append_pair("wp", &locations.join(";"));
            }
        }
        url.to_string()
    }
}

#[async_trait]
impl SourceScraper for PracujScraper {
    fn source(&self) -> JobSource {
        JobSource::Pracuj
    }

    async fn scrape(&self, criteria: &JobSearchCriteria) -> Result<Vec<RawJobOffer>> {
        self.page
            .scrape_titles(criteria, |title| Ok(self.search_url(title, criteria)))
            .await
    }
}
