//! AI coaching - Gemini `generateContent` client
//!
//! The generated text is shown as-is. The only check is that the response
//! carries a first candidate with non-empty text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{EngineError, EngineResult};
use crate::models::TrainingLog;
use crate::prompts::{alternatives_prompt, session_analysis_prompt};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that turns one prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> EngineResult<String>;
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
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
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
struct ApiError {
    message: String,
}

/// First candidate's first text part
fn extract_text(response: &GenerateResponse) -> EngineResult<String> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.as_deref())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EngineError::text_generation("unexpected response structure: no candidate text"))
}

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Point at another endpoint (proxy, local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> EngineResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::text_generation(format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::text_generation(format!("failed to read response: {}", e.without_url())))?;

        let parsed: Option<GenerateResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            error!(status = %status, "Gemini API error");
            return Err(EngineError::text_generation(format!("API error ({}): {}", status, message)));
        }

        let parsed = parsed.ok_or_else(|| {
            error!(response = %body, "Failed to parse Gemini response");
            EngineError::text_generation("malformed response")
        })?;

        if let Some(err) = &parsed.error {
            return Err(EngineError::text_generation(format!("API error: {}", err.message)));
        }

        extract_text(&parsed)
    }
}

/// AI review of a logged session
pub async fn session_insight(generator: &dyn TextGenerator, log: &TrainingLog) -> EngineResult<String> {
    info!(date = %log.date, exercises = log.exercises.len(), "Requesting session insight");
    generator.generate(&session_analysis_prompt(log)).await
}

/// AI suggestions of alternative exercises
pub async fn exercise_alternatives(generator: &dyn TextGenerator, target: &str) -> EngineResult<String> {
    let prompt = alternatives_prompt(target)?;
    info!(query = %target.trim(), "Requesting exercise alternatives");
    generator.generate(&prompt).await
}
