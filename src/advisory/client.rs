//! Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{AdvisoryError, AdvisoryResult};
use super::prompt::build_prompt;
use super::{AdviceOutcome, Advisor, FALLBACK_ADVICE};
use crate::profile::InvestmentProfile;
use crate::projection::TaxResult;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Connection settings for the advisory provider
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AdvisoryConfig {
    /// Read settings from `API_KEY` (or `GEMINI_API_KEY`), `ADVISORY_MODEL`
    /// and `ADVISORY_BASE_URL`
    pub fn from_env() -> Self {
        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let mut config = Self { api_key, ..Self::default() };
        if let Ok(model) = std::env::var("ADVISORY_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("ADVISORY_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP advisor backed by the Gemini API
#[derive(Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: AdvisoryConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisoryConfig) -> AdvisoryResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: reqwest::Client, config: AdvisoryConfig) -> Self {
        Self { client, config }
    }

    /// Request advice, surfacing any failure
    pub async fn request_advice(
        &self,
        profile: &InvestmentProfile,
        result: &TaxResult,
    ) -> AdvisoryResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisoryError::MissingCredential)?;

        let prompt = build_prompt(profile, result);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(AdvisoryError::Provider { status: status.as_u16(), message });
        }

        let payload: GenerateResponse = response.json().await?;
        extract_text(payload)
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn advise(&self, profile: &InvestmentProfile, result: &TaxResult) -> AdviceOutcome {
        match self.request_advice(profile, result).await {
            Ok(text) => AdviceOutcome::Advice(text),
            Err(e) => {
                log::warn!("Advisory request failed: {}", e);
                AdviceOutcome::Fallback(FALLBACK_ADVICE.to_string())
            }
        }
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(payload: GenerateResponse) -> AdvisoryResult<String> {
    let text: String = payload
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(AdvisoryError::EmptyResponse)
    } else {
        Ok(text)
    }
}
