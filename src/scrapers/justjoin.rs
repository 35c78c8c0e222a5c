// src/scrapers/justjoin.rs

//! justjoin.it scraper.
//!
//! The board reads its filters from the URL fragment rather than the query
//! string, and has no location filter on the all-locations listing.

use async_trait::async_trait;
use reqwest::Client;
use url::{Url, form_urlencoded};

use crate::error::Result;
use crate::models::{JobSearchCriteria, JobSource, RawJobOffer, ScraperConfig, SiteSelectors};
use crate::scrapers::SourceScraper;
use crate::scrapers::page::PageScraper;

pub struct JustJoinScraper {
    page: PageScraper,
    search_url: Url,
}

impl JustJoinScraper {
    pub fn new(client: Client, config: &ScraperConfig, site: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            page: PageScraper::new(JobSource::JustJoin, client, config, site)?,
            search_url: Url::parse(&site.search_url)?,
        })
    }

    /// `#keyword=<title>&experienceLevel=<x,y>`
    pub fn search_url(&self, title: &str, criteria: &JobSearchCriteria) -> String {
        let mut fragment = form_urlencoded::Serializer::new(String::new());
        fragment.append_pair("keyword", title);

        let seniorities = criteria.seniority_labels();
        if !seniorities.is_empty() {
            fragment.append_pair("experienceLevel", &seniorities.join(","));
        }

        let mut url = self.search_url.clone();
        url.set_fragment(Some(&fragment.finish()));
        url.to_string()
    }
}

#[async_trait]
impl SourceScraper for JustJoinScraper {
    fn source(&self) -> JobSource {
        JobSource::JustJoin
    }

    async fn scrape(&self, criteria: &JobSearchCriteria) -> Result<Vec<RawJobOffer>> {
        self.page
            .scrape_titles(criteria, |title| Ok(self.search_url(title, criteria)))
            .await
    }
}
