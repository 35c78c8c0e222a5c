//! Canonical job offer and its value objects.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::JobSource;
use crate::error::{AppError, Result};

/// Pay period of a structured salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    Hourly,
    #[default]
    Monthly,
    Yearly,
}

impl FromStr for SalaryPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(SalaryPeriod::Hourly),
            "monthly" => Ok(SalaryPeriod::Monthly),
            "yearly" => Ok(SalaryPeriod::Yearly),
            other => Err(AppError::mapping(format!("Unknown salary period '{}'", other))),
        }
    }
}

/// Whether a salary is quoted before or after tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrossNet {
    Gross,
    Net,
    #[default]
    Unspecified,
}

impl FromStr for GrossNet {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gross" => Ok(GrossNet::Gross),
            "net" => Ok(GrossNet::Net),
            "unspecified" => Ok(GrossNet::Unspecified),
            other => Err(AppError::mapping(format!("Unknown gross/net value '{}'", other))),
        }
    }
}

/// Salary of a job offer: free text or a structured range, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryInfo {
    Text {
        raw_text: String,
    },
    Structured {
        min: Option<f64>,
        max: Option<f64>,
        currency: String,
        period: SalaryPeriod,
        gross_net: GrossNet,
    },
}

impl SalaryInfo {
    pub fn from_text(text: impl Into<String>) -> Self {
        SalaryInfo::Text {
            raw_text: text.into(),
        }
    }

    pub fn from_structured(
        min: Option<f64>,
        max: Option<f64>,
        currency: impl Into<String>,
        period: SalaryPeriod,
        gross_net: GrossNet,
    ) -> Self {
        SalaryInfo::Structured {
            min,
            max,
            currency: currency.into(),
            period,
            gross_net,
        }
    }
}

impl fmt::Display for SalaryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalaryInfo::Text { raw_text } => f.write_str(raw_text),
            SalaryInfo::Structured {
                min,
                max,
                currency,
                period,
                ..
            } => {
                let amount = match (min, max) {
                    (Some(min), Some(max)) => format!("{}-{}", min, max),
                    (Some(min), None) => format!("from {}", min),
                    (None, Some(max)) => format!("up to {}", max),
                    (None, None) => "?".to_string(),
                };
                write!(f, "{} {} ({:?})", amount, currency, period)
            }
        }
    }
}

/// Required experience: free text or a closed range of years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearsExperience {
    Text(String),
    Range { min: i32, max: i32 },
}

impl YearsExperience {
    pub fn from_text(text: impl Into<String>) -> Self {
        YearsExperience::Text(text.into())
    }

    pub fn from_years(years: i32) -> Self {
        YearsExperience::Range {
            min: years,
            max: years,
        }
    }

    /// Build a range, rejecting `min > max`.
    pub fn from_range(min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(AppError::mapping(format!(
                "Experience range is inverted: {} > {}",
                min, max
            )));
        }
        Ok(YearsExperience::Range { min, max })
    }
}

/// Canonical, storage-ready job record. `link` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub link: String,
    pub title: String,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    pub source: JobSource,

    #[serde(default)]
    pub salary: Option<SalaryInfo>,

    #[serde(default)]
    pub years_experience: Option<YearsExperience>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub posted_date: Option<NaiveDate>,

    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,

    /// Description text the offer was normalized from
    #[serde(default)]
    pub raw_text_snapshot: Option<String>,

    pub ingested_at: DateTime<Utc>,
}

impl JobOffer {
    /// Company name unless it is missing or empty.
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_deref().filter(|c| !c.is_empty())
    }
}
