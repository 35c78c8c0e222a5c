// src/normalizer/mod.rs

//! Raw posting normalization.

pub mod openai;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NormalizedJobData, RawJobOffer};

pub use openai::OpenAiNormalizer;

/// Turns one raw posting into a canonical-shaped candidate.
///
/// `Ok(None)` means the posting could not be understood; `Err` means the
/// normalizer itself failed (transport, auth). The pipeline counts both as
/// a failed item.
#[async_trait]
pub trait JobNormalizer: Send + Sync {
    async fn normalize(&self, raw: &RawJobOffer) -> Result<Option<NormalizedJobData>>;
}
