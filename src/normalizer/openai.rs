// src/normalizer/openai.rs

//! Chat-completions backed normalizer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{NormalizedJobData, NormalizerConfig, RawJobOffer};
use crate::normalizer::JobNormalizer;

const SYSTEM_PROMPT: &str = "You are a strict information extractor. Output only valid JSON \
matching the provided shape. If a field is missing in the source, use null or an empty array \
as appropriate. Do not invent data.";

const EXPECTED_SHAPE: &str = r#"{
  "title": "string",
  "link": "string (uri)",
  "salary": "string with the original salary text, or {\"min\": number, \"max\": number, \"currency\": \"string\", \"period\": \"monthly|yearly|hourly\", \"grossNet\": \"gross|net|unspecified\"}, or null",
  "years_experience": "number, or {\"min\": number, \"max\": number}, or string, or null",
  "skills": ["string"],
  "company": "string or null",
  "location": "string or null",
  "source": "string",
  "posted_date": "YYYY-MM-DD or null",
  "expiration_date": "YYYY-MM-DD or null"
}"#;

const RULES: &str = "\
- Parse salary ranges and currency when possible; otherwise return the original salary text as a string.
- Infer years of experience from phrases like \"2+ years\", \"mid\", etc. If unclear, null.
- Extract skills as an array of canonical tech names (e.g., \".NET\", \"C#\", \"Angular\", \"Azure\", \"SQL\").
- Dates in ISO 8601 (YYYY-MM-DD).
- Return JSON only.";

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

/// Normalizer calling an OpenAI-compatible chat completions endpoint.
pub struct OpenAiNormalizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
}

impl OpenAiNormalizer {
    /// Build from config; the API key falls back to `OPENAI_API_KEY`.
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &NormalizerConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: String) -> reqwest::Result<Option<String>> {
        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let api_response: ChatCompletionResponse = resp.json().await?;
        Ok(api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content))
    }
}

#[async_trait]
impl JobNormalizer for OpenAiNormalizer {
    async fn normalize(&self, raw: &RawJobOffer) -> Result<Option<NormalizedJobData>> {
        log::debug!("Normalizing job: {}", raw.link);

        let content = self.complete(build_prompt(raw)).await.map_err(|e| {
            AppError::normalize(format!("Completion request failed for {}: {}", raw.link, e))
        })?;

        match content {
            Some(content) => Ok(parse_content(&content, raw)),
            None => {
                log::warn!("Empty response for job: {}", raw.link);
                Ok(None)
            }
        }
    }
}

/// User prompt carrying the raw fields and the expected output shape.
pub fn build_prompt(raw: &RawJobOffer) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    format!(
        "SourceSite: {source}\n\
         URL: {link}\n\
         \n\
         RawFields:\n\
         Title: {title}\n\
         Company: {company}\n\
         Location: {location}\n\
         SalaryText: {salary}\n\
         ExpirationText: {expiration}\n\
         PostedText: {posted}\n\
         \n\
         Description:\n\
         {description}\n\
         \n\
         Expected JSON:\n\
         {shape}\n\
         \n\
         Rules:\n\
         {rules}",
        source = raw.source,
        link = raw.link,
        title = raw.scraped_title,
        company = field(&raw.scraped_company),
        location = field(&raw.scraped_location),
        salary = field(&raw.scraped_salary_text),
        expiration = field(&raw.scraped_expiration_text),
        posted = field(&raw.scraped_posted_text),
        description = field(&raw.cleaned_description),
        shape = EXPECTED_SHAPE,
        rules = RULES,
    )
}

/// Parse completion content; None when it is blank or not the expected JSON.
///
/// A missing link or source is filled in from the raw offer.
pub fn parse_content(content: &str, raw: &RawJobOffer) -> Option<NormalizedJobData> {
    let json = strip_code_fence(content.trim());
    if json.is_empty() {
        log::warn!("Empty response for job: {}", raw.link);
        return None;
    }

    let mut data: NormalizedJobData = match serde_json::from_str(json) {
        Ok(data) => data,
        Err(e) => {
            log::error!("Failed to parse normalizer JSON for job {}: {}", raw.link, e);
            return None;
        }
    };

    if data.link.trim().is_empty() {
        data.link = raw.link.clone();
    }
    if data.source.trim().is_empty() {
        data.source = raw.source.as_str().to_string();
    }
    Some(data)
}

fn strip_code_fence(content: &str) -> &str {
    let Some(inner) = content.strip_prefix("```") else {
        return content;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
