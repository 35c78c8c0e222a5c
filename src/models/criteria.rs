//! Search criteria driving a scraping run.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Seniority levels understood by the job boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl Seniority {
    /// Lowercase label used in board query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid",
            Seniority::Senior => "senior",
            Seniority::Lead => "lead",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Seniority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "junior" => Ok(Seniority::Junior),
            "mid" => Ok(Seniority::Mid),
            "senior" => Ok(Seniority::Senior),
            "lead" => Ok(Seniority::Lead),
            other => Err(AppError::validation(format!(
                "Unknown seniority level '{}'. Valid values: junior, mid, senior, lead",
                other
            ))),
        }
    }
}

/// What to search for across all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSearchCriteria {
    /// Job titles to search for (at least one)
    pub titles: Vec<String>,

    /// Locations to restrict the search to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,

    /// Seniority levels to restrict the search to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniorities: Option<Vec<Seniority>>,

    /// Only postings published on or after this instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,

    /// Per-source cap on scraped postings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_site: Option<u32>,
}

impl JobSearchCriteria {
    /// Create criteria for the given titles with no other filters.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Validate against the current time.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(Utc::now())
    }

    /// Validate against an explicit reference time.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        if self.titles.iter().all(|t| t.trim().is_empty()) {
            return Err(AppError::validation(
                "At least one job title must be specified",
            ));
        }
        if self.max_per_site == Some(0) {
            return Err(AppError::validation("Max per site must be greater than 0"));
        }
        if let Some(date_from) = self.date_from {
            if date_from > now {
                return Err(AppError::validation("Date from cannot be in the future"));
            }
        }
        Ok(())
    }

    /// Non-empty, trimmed titles.
    pub fn search_titles(&self) -> impl Iterator<Item = &str> {
        self.titles
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    /// Non-empty, trimmed locations.
    pub fn search_locations(&self) -> Vec<&str> {
        self.locations
            .iter()
            .flatten()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Seniority labels as the job boards spell them.
    pub fn seniority_labels(&self) -> Vec<&'static str> {
        self.seniorities.iter().flatten().map(|s| s.as_str()).collect()
    }

    /// Effective per-source cap.
    pub fn cap(&self, default_max_per_site: usize) -> usize {
        self.max_per_site
            .map(|m| m as usize)
            .unwrap_or(default_max_per_site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_valid_criteria() {
        let criteria = JobSearchCriteria::new(["Rust Developer"]);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_titles() {
        assert!(JobSearchCriteria::new(Vec::<String>::new()).validate().is_err());
        assert!(JobSearchCriteria::new(["  "]).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_max_per_site() {
        let criteria = JobSearchCriteria {
            max_per_site: Some(0),
            ..JobSearchCriteria::new(["Backend"])
        };
        let err = criteria.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_future_date_from() {
        let now = Utc::now();
        let criteria = JobSearchCriteria {
            date_from: Some(now + Duration::days(1)),
            ..JobSearchCriteria::new(["Backend"])
        };
        assert!(criteria.validate_at(now).is_err());

        let criteria = JobSearchCriteria {
            date_from: Some(now - Duration::days(7)),
            ..JobSearchCriteria::new(["Backend"])
        };
        assert!(criteria.validate_at(now).is_ok());
    }

    #[test]
    fn test_cap_falls_back_to_default() {
        let criteria = JobSearchCriteria::new(["Backend"]);
        assert_eq!(criteria.cap(50), 50);

        let criteria = JobSearchCriteria {
            max_per_site: Some(10),
            ..criteria
        };
        assert_eq!(criteria.cap(50), 10);
    }

    #[test]
    fn test_search_filters_skip_blanks() {
        let criteria = JobSearchCriteria {
            locations: Some(vec![" Warszawa ".into(), "".into(), "Kraków".into()]),
            seniorities: Some(vec![Seniority::Junior, Seniority::Lead]),
            ..JobSearchCriteria::new(["Backend", " ", " Rust "])
        };
        assert_eq!(criteria.search_titles().collect::<Vec<_>>(), vec!["Backend", "Rust"]);
        assert_eq!(criteria.search_locations(), vec!["Warszawa", "Kraków"]);
        assert_eq!(criteria.seniority_labels(), vec!["junior", "lead"]);
        assert!(JobSearchCriteria::new(["x"]).search_locations().is_empty());
    }

    #[test]
    fn test_seniority_parse() {
        assert_eq!("Senior".parse::<Seniority>().unwrap(), Seniority::Senior);
        assert!("intern".parse::<Seniority>().is_err());
    }
}
