// src/error.rs

//! Unified error handling for the job scraper.

use std::fmt;

use thiserror::Error;

use crate::models::JobSource;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search criteria or data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A source could not be scraped
    #[error("Scrape error for {site}: {message}")]
    Scrape { site: JobSource, message: String },

    /// The normalizer could not be reached or answered with an error
    #[error("Normalize error: {0}")]
    Normalize(String),

    /// Normalized data could not be mapped to a job offer
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Record store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a scrape error for a source.
    pub fn scrape(site: JobSource, message: impl fmt::Display) -> Self {
        Self::Scrape {
            site,
            message: message.to_string(),
        }
    }

    /// Create a normalizer error.
    pub fn normalize(message: impl fmt::Display) -> Self {
        Self::Normalize(message.to_string())
    }

    /// Create a mapping error.
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping(message.into())
    }

    /// Create a storage error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }
}
