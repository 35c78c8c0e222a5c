//! Mapping from normalizer output to canonical job offers.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    ExperienceInput, GrossNet, JobOffer, JobSource, NormalizedJobData, RawJobOffer, SalaryBag,
    SalaryInfo, SalaryInput, SalaryPeriod, YearsExperience,
};

/// Map a normalized candidate to a job offer, stamped with the current time.
pub fn map_to_job_offer(data: NormalizedJobData, raw: &RawJobOffer) -> Result<JobOffer> {
    map_to_job_offer_at(data, raw, Utc::now())
}

/// Map a normalized candidate to a job offer ingested at `ingested_at`.
pub fn map_to_job_offer_at(
    data: NormalizedJobData,
    raw: &RawJobOffer,
    ingested_at: DateTime<Utc>,
) -> Result<JobOffer> {
    let source: JobSource = data.source.parse()?;
    let salary = data.salary.map(map_salary).transpose()?.flatten();
    let years_experience = data.years_experience.map(map_experience).transpose()?;

    Ok(JobOffer {
        link: data.link,
        title: data.title,
        company: data.company,
        location: data.location,
        source,
        salary,
        years_experience,
        skills: data.skills,
        posted_date: data.posted_date,
        expiration_date: data.expiration_date,
        raw_text_snapshot: raw.cleaned_description.clone(),
        ingested_at,
    })
}

/// Text stays text; a structured bag needs a currency or the salary is dropped.
pub fn map_salary(input: SalaryInput) -> Result<Option<SalaryInfo>> {
    match input {
        SalaryInput::Text(text) => Ok(Some(SalaryInfo::from_text(text))),
        SalaryInput::Structured(bag) => map_salary_bag(bag),
    }
}

fn map_salary_bag(bag: SalaryBag) -> Result<Option<SalaryInfo>> {
    let Some(currency) = bag.currency.filter(|c| !c.trim().is_empty()) else {
        return Ok(None);
    };

    let period = match bag.period.as_deref() {
        Some(p) if !p.trim().is_empty() => p.parse()?,
        _ => SalaryPeriod::default(),
    };
    let gross_net = match bag.gross_net.as_deref() {
        Some(g) if !g.trim().is_empty() => g.parse()?,
        _ => GrossNet::default(),
    };

    Ok(Some(SalaryInfo::from_structured(
        bag.min,
        bag.max,
        currency.trim(),
        period,
        gross_net,
    )))
}

/// Numbers become a single-point range; reals truncate toward zero.
pub fn map_experience(input: ExperienceInput) -> Result<YearsExperience> {
    match input {
        ExperienceInput::Text(text) => Ok(YearsExperience::from_text(text)),
        ExperienceInput::Integer(years) => i32::try_from(years)
            .map(YearsExperience::from_years)
            .map_err(|_| AppError::mapping(format!("Years of experience out of range: {}", years))),
        ExperienceInput::Real(years) => whole_years(years).map(YearsExperience::from_years),
        ExperienceInput::Range { min, max } => {
            YearsExperience::from_range(whole_years(min)?, whole_years(max)?)
        }
    }
}

fn whole_years(years: f64) -> Result<i32> {
    if !years.is_finite() || years.trunc().abs() > i32::MAX as f64 {
        return Err(AppError::mapping(format!(
            "Years of experience out of range: {}",
            years
        )));
    }
    Ok(years.trunc() as i32)
}
