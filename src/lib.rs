// src/lib.rs

//! Job posting ingestion library.
//!
//! Scrapes job boards, normalizes each posting into a canonical offer,
//! removes duplicates and stores the survivors.

pub mod error;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod scrapers;
pub mod storage;
pub mod utils;
