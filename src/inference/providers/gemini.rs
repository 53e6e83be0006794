//! Google Gemini provider using the `generateContent` endpoint.
//!
//! This module uses Gemini API terminology:
//! - "contents" (array of turns), each with "parts"
//! - "candidates" in the response, the first one carries the reply

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::{GenerationRequest, GenerativeProvider, ProviderError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Value shipped in example env files. Treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error envelope: `{"error": {"code": 400, "message": "...", "status": "..."}}`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Returns true when the key is usable (non-empty, not the placeholder).
pub fn is_usable_key(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Pulls the reply text out of a parsed response.
///
/// Concatenates every text part of the first candidate. A blocked prompt or a
/// candidate without text is reported as `EmptyResponse`.
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::EmptyResponse(format!("prompt blocked: {reason}")));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProviderError::EmptyResponse("no candidates returned".to_string()));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(ProviderError::EmptyResponse(format!(
            "candidate had no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}

/// Best-effort readable message from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Gemini API provider (single, non-streaming request per message)
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key (may be empty; `is_configured` reports it)
    /// * `base_url` - Optional custom base URL (defaults to Google's v1beta API)
    /// * `timeout` - Optional whole-request timeout
    pub fn new(api_key: String, base_url: Option<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
            reqwest::Client::new()
        });

        Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        is_usable_key(&self.api_key)
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Config("API key not configured".to_string()));
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: request.prompt,
                }],
            }],
        };

        info!(
            "Gemini generateContent request: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: error_message(&err_body),
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = extract_text(parsed)?;
        info!("Gemini reply received: {} bytes", text.len());
        Ok(text)
    }
}
