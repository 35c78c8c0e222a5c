// src/scrapers/page.rs

//! Listing-page scraping shared by every site.

use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{JobSearchCriteria, JobSource, RawJobOffer, ScraperConfig, SiteSelectors};
use crate::scrapers::html::{self, CardSelectors, ScrapedCard};
use crate::utils::http::{self, RetryPolicy};
use crate::utils::truncate;

/// Fetches search result pages for one site and turns cards into raw offers.
pub struct PageScraper {
    source: JobSource,
    client: Client,
    policy: RetryPolicy,
    base_url: Url,
    selectors: CardSelectors,
    default_max_per_site: usize,
    description_max_chars: usize,
}

impl PageScraper {
    pub fn new(
        source: JobSource,
        client: Client,
        config: &ScraperConfig,
        site: &SiteSelectors,
    ) -> Result<Self> {
        Ok(Self {
            source,
            client,
            policy: RetryPolicy::from_config(config),
            base_url: Url::parse(&site.base_url)?,
            selectors: CardSelectors::compile(site)?,
            default_max_per_site: config.default_max_per_site,
            description_max_chars: config.description_max_chars,
        })
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> JobSource {
        self.source
    }

    /// Run one search per title and concatenate the results.
    ///
    /// A failing title is logged and skipped. The call fails only when every
    /// title fails.
    pub async fn scrape_titles<F>(
        &self,
        criteria: &JobSearchCriteria,
        build_url: F,
    ) -> Result<Vec<RawJobOffer>>
    where
        F: Fn(&str) -> Result<String>,
    {
        let cap = criteria.cap(self.default_max_per_site);
        let mut offers = Vec::new();
        let mut attempted = 0;
        let mut last_error = None;
        let mut failed = 0;

        for title in criteria.search_titles() {
            attempted += 1;
            let result = match build_url(title) {
                Ok(url) => self.scrape_page(&url, cap).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(found) => {
                    log::info!(
                        "Extracted {} jobs for title '{}' from {}",
                        found.len(),
                        title,
                        self.source
                    );
                    offers.extend(found);
                }
                Err(e) => {
                    log::error!("Failed to scrape {} for title '{}': {}", self.source, title, e);
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failed == attempted => Err(AppError::scrape(self.source, e)),
            _ => Ok(offers),
        }
    }

    /// Scrape a single search results page.
    pub async fn scrape_page(&self, url: &str, cap: usize) -> Result<Vec<RawJobOffer>> {
        log::info!("Scraping {}: {}", self.source, url);

        let body = http::fetch_text(&self.client, url, &self.policy).await?;
        let cards = html::extract_cards(&body, &self.selectors, &self.base_url, cap);

        let mut offers = Vec::with_capacity(cards.len());
        for card in cards {
            let description = if self.selectors.detail.is_empty() {
                card.text
                    .as_deref()
                    .map(|text| truncate(text, self.description_max_chars))
            } else {
                self.fetch_description(&card.link).await
            };
            offers.push(self.to_raw(card, description));
        }
        Ok(offers)
    }

    /// Detail page text; a failed fetch yields no description.
    async fn fetch_description(&self, link: &str) -> Option<String> {
        match http::fetch_text(&self.client, link, &self.policy).await {
            Ok(body) => {
                html::extract_description(&body, &self.selectors.detail, self.description_max_chars)
            }
            Err(e) => {
                log::warn!("Failed to fetch job details {}: {}", link, e);
                None
            }
        }
    }

    fn to_raw(&self, card: ScrapedCard, description: Option<String>) -> RawJobOffer {
        let mut raw = RawJobOffer::new(self.source, card.title, card.link);
        raw.scraped_company = card.company;
        raw.scraped_location = card.location;
        raw.scraped_salary_text = card.salary;
        raw.cleaned_description = description;
        raw
    }
}
