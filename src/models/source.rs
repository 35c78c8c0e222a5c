//! Job board identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A job board the scraper knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobSource {
    JustJoin,
    NoFluffJobs,
    Pracuj,
}

impl JobSource {
    /// Every supported source, in default scraping priority.
    pub const ALL: [JobSource; 3] = [JobSource::NoFluffJobs, JobSource::Pracuj, JobSource::JustJoin];

    /// Canonical name, as written to storage and shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::JustJoin => "JustJoin",
            JobSource::NoFluffJobs => "NoFluffJobs",
            JobSource::Pracuj => "Pracuj",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSource {
    type Err = AppError;

    /// Case-insensitive lookup by canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::mapping(format!("Unknown job source '{}'", s)))
    }
}
