//! Unparsed job posting as scraped from a board.

use serde::{Deserialize, Serialize};

use super::JobSource;

/// A job posting as scraped, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawJobOffer {
    /// Title text from the listing card
    pub scraped_title: String,

    #[serde(default)]
    pub scraped_company: Option<String>,

    #[serde(default)]
    pub scraped_location: Option<String>,

    #[serde(default)]
    pub scraped_salary_text: Option<String>,

    #[serde(default)]
    pub scraped_expiration_text: Option<String>,

    #[serde(default)]
    pub scraped_posted_text: Option<String>,

    /// Whitespace-normalized description text
    #[serde(default)]
    pub cleaned_description: Option<String>,

    /// Absolute URL of the posting (identity key)
    pub link: String,

    /// Board the posting was scraped from
    pub source: JobSource,
}

impl RawJobOffer {
    /// Create a raw offer with only the required fields set.
    pub fn new(source: JobSource, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            scraped_title: title.into(),
            scraped_company: None,
            scraped_location: None,
            scraped_salary_text: None,
            scraped_expiration_text: None,
            scraped_posted_text: None,
            cleaned_description: None,
            link: link.into(),
            source,
        }
    }
}
