//! Normalizer output: a best-effort canonical candidate.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Salary as returned by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    /// Unparsed salary text
    Text(String),
    /// Structured salary; `currency` decides whether it is usable
    Structured(SalaryBag),
}

/// Structured salary fields, all optional on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryBag {
    #[serde(default, deserialize_with = "amount")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "amount")]
    pub max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default, rename = "grossNet", alias = "gross_net")]
    pub gross_net: Option<String>,
}

/// Years of experience as returned by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceInput {
    Integer(i64),
    Real(f64),
    Text(String),
    Range { min: f64, max: f64 },
}

/// Canonical-shaped candidate produced from exactly one raw offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJobData {
    pub title: String,
    pub link: String,

    #[serde(default, deserialize_with = "lenient")]
    pub salary: Option<SalaryInput>,

    #[serde(
        default,
        alias = "required_years_experience",
        deserialize_with = "lenient"
    )]
    pub years_experience: Option<ExperienceInput>,

    #[serde(default, alias = "required_skills")]
    pub skills: Vec<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// Source name, resolved case-insensitively during mapping
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub posted_date: Option<NaiveDate>,

    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

/// Amount as a JSON number or a numeric string such as `"10 000"`.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => {
            let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
            if digits.is_empty() {
                return Ok(None);
            }
            digits
                .replace(',', ".")
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid amount: {:?}", s)))
        }
        Some(other) => Err(D::Error::custom(format!("invalid amount: {}", other))),
    }
}

/// Optional field that degrades to None when its shape is not recognized.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            log::warn!("Ignoring unrecognized value {}: {}", value, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_text_variant() {
        let data: NormalizedJobData = serde_json::from_str(
            r#"{"title":"Dev","link":"https://x/1","salary":"15k PLN","source":"pracuj"}"#,
        )
        .unwrap();
        assert_eq!(data.salary, Some(SalaryInput::Text("15k PLN".into())));
    }

    #[test]
    fn test_salary_structured_variant() {
        let data: NormalizedJobData = serde_json::from_str(
            r#"{"title":"Dev","link":"https://x/1","source":"pracuj",
                "salary":{"min":10000,"max":15000,"currency":"PLN","grossNet":"net"}}"#,
        )
        .unwrap();
        match data.salary {
            Some(SalaryInput::Structured(bag)) => {
                assert_eq!(bag.min, Some(10000.0));
                assert_eq!(bag.currency.as_deref(), Some("PLN"));
                assert_eq!(bag.gross_net.as_deref(), Some("net"));
                assert!(bag.period.is_none());
            }
            other => panic!("unexpected salary {:?}", other),
        }
    }

    #[test]
    fn test_experience_variants() {
        let parse = |v: &str| -> Option<ExperienceInput> {
            let json = format!(
                r#"{{"title":"Dev","link":"l","source":"s","years_experience":{}}}"#,
                v
            );
            serde_json::from_str::<NormalizedJobData>(&json)
                .unwrap()
                .years_experience
        };

        assert_eq!(parse("3"), Some(ExperienceInput::Integer(3)));
        assert_eq!(parse("2.5"), Some(ExperienceInput::Real(2.5)));
        assert_eq!(parse(r#""2+ years""#), Some(ExperienceInput::Text("2+ years".into())));
        assert_eq!(parse("null"), None);
        assert_eq!(
            parse(r#"{"min":2,"max":5}"#),
            Some(ExperienceInput::Range { min: 2.0, max: 5.0 })
        );
        assert_eq!(parse("[1,2]"), None);
    }

    #[test]
    fn test_unrecognized_salary_shape_keeps_posting() {
        let parse = |v: &str| -> NormalizedJobData {
            let json = format!(
                r#"{{"title":"Dev","link":"l","source":"pracuj","skills":["Rust"],"salary":{}}}"#,
                v
            );
            serde_json::from_str(&json).unwrap()
        };

        let data = parse("15000");
        assert!(data.salary.is_none());
        assert_eq!(data.skills, vec!["Rust"]);

        assert!(parse(r#"{"min":"lots","currency":"PLN"}"#).salary.is_none());
        assert!(parse("true").salary.is_none());
    }

    #[test]
    fn test_salary_amounts_as_strings() {
        let data: NormalizedJobData = serde_json::from_str(
            r#"{"title":"Dev","link":"l","source":"pracuj",
                "salary":{"min":"10000","max":"15 000,50","currency":"PLN"}}"#,
        )
        .unwrap();
        match data.salary {
            Some(SalaryInput::Structured(bag)) => {
                assert_eq!(bag.min, Some(10000.0));
                assert_eq!(bag.max, Some(15000.5));
            }
            other => panic!("unexpected salary {:?}", other),
        }
    }

    #[test]
    fn test_dates_and_skills() {
        let data: NormalizedJobData = serde_json::from_str(
            r#"{"title":"Dev","link":"l","source":"s","required_skills":["Rust","SQL"],
                "posted_date":"2026-01-15","expiration_date":null}"#,
        )
        .unwrap();
        assert_eq!(data.skills, vec!["Rust", "SQL"]);
        assert_eq!(data.posted_date, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert!(data.expiration_date.is_none());
    }
}
