//! Gemini REST API client.

use super::{Generator, ModelInfo};
use crate::config::GenerationSettings;
use crate::error::{AkwaabaError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Success reply when the model answered with no candidate text.
const NO_RESPONSE_TEXT: &str = "⚠️ No response text found.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
}

/// Client for the Gemini generateContent and model-catalog endpoints.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// A missing API key is allowed here; calls then fail with a descriptive
    /// error at request time.
    pub fn new(settings: &GenerationSettings, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AkwaabaError::Generation("GEMINI_API_KEY is not set".to_string()))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.key()?
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AkwaabaError::Generation(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let data: GenerateResponse = response.json().await?;
        let text = candidate_text(&data);
        if text.is_empty() {
            return Ok(NO_RESPONSE_TEXT.to_string());
        }

        debug!("Generated {} characters", text.chars().count());
        Ok(text)
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models?key={}&pageSize=1000", self.base_url, self.key()?);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AkwaabaError::Generation(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let data: ModelsResponse = response.json().await?;
        Ok(data
            .models
            .into_iter()
            .map(|model| ModelInfo {
                name: model.name,
                display_name: model.display_name,
                description: model.description,
            })
            .collect())
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default()
}
