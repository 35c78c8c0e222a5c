//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::JobSource;
use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// AI normalizer settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Record store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Console output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-board URLs and CSS selectors
    #[serde(default)]
    pub sites: SitesConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.max_concurrent_sources == 0 {
            return Err(AppError::validation(
                "scraper.max_concurrent_sources must be > 0",
            ));
        }
        if self.scraper.default_max_per_site == 0 {
            return Err(AppError::validation(
                "scraper.default_max_per_site must be > 0",
            ));
        }
        if self.scraper.sources.is_empty() {
            return Err(AppError::validation("No sources enabled"));
        }
        if self.normalizer.model.trim().is_empty() {
            return Err(AppError::validation("normalizer.model is empty"));
        }
        if self.normalizer.timeout_secs == 0 {
            return Err(AppError::validation("normalizer.timeout_secs must be > 0"));
        }
        for source in &self.scraper.sources {
            self.sites.get(*source).validate(*source)?;
        }
        Ok(())
    }
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before each request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Retries for transient HTTP failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Per-source cap when the criteria do not set one
    #[serde(default = "defaults::max_per_site")]
    pub default_max_per_site: usize,

    /// Sources scraped at the same time
    #[serde(default = "defaults::max_concurrent_sources")]
    pub max_concurrent_sources: usize,

    /// Descriptions longer than this are truncated
    #[serde(default = "defaults::description_max_chars")]
    pub description_max_chars: usize,

    /// Enabled sources, in priority order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<JobSource>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_retries: defaults::max_retries(),
            default_max_per_site: defaults::max_per_site(),
            max_concurrent_sources: defaults::max_concurrent_sources(),
            description_max_chars: defaults::description_max_chars(),
            sources: defaults::sources(),
        }
    }
}

/// AI normalizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// API key; falls back to `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "defaults::model")]
    pub model: String,

    /// Chat completions endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "defaults::normalizer_timeout")]
    pub timeout_secs: u64,
}

impl NormalizerConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("OpenAI API key not configured"))
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::model(),
            endpoint: defaults::endpoint(),
            temperature: 0.0,
            timeout_secs: defaults::normalizer_timeout(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File name of the job store inside the storage directory
    #[serde(default = "defaults::jobs_file")]
    pub jobs_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            jobs_file: defaults::jobs_file(),
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Print live progress lines during a run
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            show_progress: defaults::show_progress(),
        }
    }
}

/// Selectors for every supported board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "defaults::justjoin")]
    pub justjoin: SiteSelectors,

    #[serde(default = "defaults::nofluffjobs")]
    pub nofluffjobs: SiteSelectors,

    #[serde(default = "defaults::pracuj")]
    pub pracuj: SiteSelectors,
}

impl SitesConfig {
    pub fn get(&self, source: JobSource) -> &SiteSelectors {
        match source {
            JobSource::JustJoin => &self.justjoin,
            JobSource::NoFluffJobs => &self.nofluffjobs,
            JobSource::Pracuj => &self.pracuj,
        }
    }
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            justjoin: defaults::justjoin(),
            nofluffjobs: defaults::nofluffjobs(),
            pracuj: defaults::pracuj(),
        }
    }
}

/// URLs and CSS selectors for scraping one board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Origin used to resolve relative links
    pub base_url: String,

    /// Search page URL, query parameters are appended
    pub search_url: String,

    /// Selector for each posting card on the search page
    pub card_selector: String,

    /// Selector for the title element within a card
    pub title_selector: String,

    /// Selector for the link element (defaults to the title element)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_selector: Option<String>,

    /// Selectors joined into the description on the detail page.
    /// Empty means the detail page is not fetched.
    #[serde(default)]
    pub detail_selectors: Vec<String>,

    /// HTML attribute holding the link (usually "href")
    #[serde(default = "defaults::attr_name")]
    pub attr_name: String,
}

impl SiteSelectors {
    fn validate(&self, source: JobSource) -> Result<()> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(AppError::validation(format!(
                "sites.{}.base_url is not a valid URL",
                source.as_str().to_lowercase()
            )));
        }
        if url::Url::parse(&self.search_url).is_err() {
            return Err(AppError::validation(format!(
                "sites.{}.search_url is not a valid URL",
                source.as_str().to_lowercase()
            )));
        }
        if self.card_selector.trim().is_empty() || self.title_selector.trim().is_empty() {
            return Err(AppError::validation(format!(
                "sites.{} needs card and title selectors",
                source.as_str().to_lowercase()
            )));
        }
        Ok(())
    }
}

mod defaults {
    use super::{JobSource, SiteSelectors};

    // Scraper defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        1000
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn max_per_site() -> usize {
        50
    }
    pub fn max_concurrent_sources() -> usize {
        3
    }
    pub fn description_max_chars() -> usize {
        2000
    }
    pub fn sources() -> Vec<JobSource> {
        JobSource::ALL.to_vec()
    }

    // Normalizer defaults
    pub fn model() -> String {
        "gpt-4o-mini".into()
    }
    pub fn endpoint() -> String {
        "https://api.openai.com/v1/chat/completions".into()
    }
    pub fn normalizer_timeout() -> u64 {
        60
    }

    // Storage defaults
    pub fn jobs_file() -> String {
        "jobs.json".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn show_progress() -> bool {
        true
    }

    // Site defaults
    pub fn attr_name() -> String {
        "href".into()
    }

    pub fn justjoin() -> SiteSelectors {
        SiteSelectors {
            base_url: "https://justjoin.it".into(),
            search_url: "https://justjoin.it/all-locations".into(),
            card_selector: "[data-test-id='virtualized-list-item']".into(),
            title_selector: "h3".into(),
            link_selector: Some("a".into()),
            company_selector: Some("[data-test-id='company-name']".into()),
            location_selector: Some("[data-test-id='location-name']".into()),
            salary_selector: Some("[data-test-id='salary-range']".into()),
            detail_selectors: Vec::new(),
            attr_name: attr_name(),
        }
    }

    pub fn nofluffjobs() -> SiteSelectors {
        SiteSelectors {
            base_url: "https://nofluffjobs.com".into(),
            search_url: "https://nofluffjobs.com/pl/jobs".into(),
            card_selector: ".posting-list-item".into(),
            title_selector: ".posting-title__position".into(),
            link_selector: None,
            company_selector: Some(".posting-title__company".into()),
            location_selector: Some(".posting-info__location".into()),
            salary_selector: Some(".posting-info__salary".into()),
            detail_selectors: vec![
                ".posting-description".into(),
                ".posting-requirements".into(),
            ],
            attr_name: attr_name(),
        }
    }

    pub fn pracuj() -> SiteSelectors {
        SiteSelectors {
            base_url: "https://www.pracuj.pl".into(),
            search_url: "https://www.pracuj.pl/praca".into(),
            card_selector: "[data-test='default-offer']".into(),
            title_selector: "h2 a".into(),
            link_selector: None,
            company_selector: Some("[data-test='text-company-name']".into()),
            location_selector: Some("[data-test='text-region']".into()),
            salary_selector: Some("[data-test='offer-salary']".into()),
            detail_selectors: Vec::new(),
            attr_name: attr_name(),
        }
    }
}
