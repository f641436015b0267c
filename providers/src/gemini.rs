//! Google Gemini client over the `generateContent` REST endpoint.
//!
//! One non-streaming call per capability. Classification and challenge
//! requests ask for JSON constrained by a response schema; image requests
//! ask the image model for a 1:1 render and take the first inline part.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use authease_types::{
    Challenge, ChallengeId, ChallengeOption, Difficulty, ImageRef, MediaType, ScoreReport,
};

use crate::response::GenerateContentResponse;
use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{
    ApiConfig, ChallengeGenerator, ContentClassifier, MediaPayload, ProviderError,
    VisualGenerator, http_client, prompts, read_capped_error_body, schema,
};

const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: ApiConfig,
    http: reqwest::Client,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ProviderError> {
        let http = http_client(&config)?;
        let retry = RetryConfig::default().with_max_retries(config.settings().max_retries);
        Ok(Self {
            config,
            http,
            retry,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST a request body to `models/{model}:generateContent`.
    pub async fn generate_content(
        &self,
        model: &str,
        body: &Value,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/models/{model}:generateContent", self.config.base_url());
        let api_key = self.config.api_key();

        let outcome = send_with_retry(
            || {
                self.http
                    .post(&url)
                    .header("x-goog-api-key", api_key)
                    .header("content-type", "application/json")
                    .json(body)
            },
            &self.retry,
        )
        .await;

        let response = match outcome {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) => {
                let status = response.status().as_u16();
                let body = read_capped_error_body(response).await;
                tracing::warn!(status, model, "Gemini request failed");
                return Err(ProviderError::Api { status, body });
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                tracing::warn!(attempts, model, error = %source, "Gemini request failed");
                return Err(ProviderError::Transport { attempts, source });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Transport {
                attempts: 1,
                source,
            })?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::malformed("response envelope", e))?;
        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                model,
                input_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }
        Ok(parsed)
    }
}

// ============================================================================
// Request bodies
// ============================================================================

fn json_generation_config(schema: Value) -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": schema,
    })
}

pub(crate) fn classification_body(payload: &MediaPayload) -> Value {
    let parts = match payload {
        MediaPayload::Typed { media, content } => {
            vec![json!({ "text": prompts::typed_analysis(*media, content) })]
        }
        MediaPayload::Inline {
            media,
            mime_type,
            data,
        } => vec![
            json!({ "inlineData": { "mimeType": mime_type, "data": data } }),
            json!({ "text": prompts::forensic_analysis(*media) }),
        ],
    };
    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": json_generation_config(schema::score_report()),
    })
}

pub(crate) fn challenge_body(media: MediaType, difficulty: Difficulty) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompts::challenge(media, difficulty) }]
        }],
        "generationConfig": json_generation_config(schema::challenge()),
    })
}

pub(crate) fn visual_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "imageConfig": { "aspectRatio": "1:1" }
        },
    })
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReport {
    source_credibility: f64,
    manipulation_risk: f64,
    ai_synthetic_prob: f64,
    trust_index: f64,
    findings: Vec<String>,
    explanation: String,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChallenge {
    #[serde(default)]
    id: Option<String>,
    narrative: String,
    option_a: WireOption,
    option_b: WireOption,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOption {
    content: String,
    is_ai: bool,
    explanation: String,
}

impl From<WireOption> for ChallengeOption {
    fn from(wire: WireOption) -> Self {
        ChallengeOption::text(wire.content, wire.is_ai, wire.explanation)
    }
}

/// Models sometimes wrap JSON in a Markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn parse_score_report(text: &str) -> Result<ScoreReport, ProviderError> {
    let wire: WireReport = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ProviderError::malformed("score report", e))?;
    ScoreReport::new(
        wire.source_credibility,
        wire.manipulation_risk,
        wire.ai_synthetic_prob,
        wire.trust_index,
        wire.findings,
        wire.explanation,
        wire.metadata.unwrap_or_default(),
    )
    .map_err(|e| ProviderError::malformed("score report", e))
}

pub(crate) fn parse_challenge(
    text: &str,
    media: MediaType,
    difficulty: Difficulty,
) -> Result<Challenge, ProviderError> {
    let wire: WireChallenge = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ProviderError::malformed("challenge", e))?;
    let id = wire
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    Ok(Challenge::new(
        ChallengeId::new(id),
        media,
        difficulty,
        wire.narrative,
        wire.option_a.into(),
        wire.option_b.into(),
    ))
}

// ============================================================================
// Capabilities
// ============================================================================

impl ContentClassifier for GeminiClient {
    async fn classify(&self, payload: MediaPayload) -> Result<ScoreReport, ProviderError> {
        let model = &self.config.settings().analysis_model;
        tracing::info!(model = %model, media = %payload.media(), "Classifying content");
        let body = classification_body(&payload);
        let response = self.generate_content(model, &body).await?;
        parse_score_report(&response.text()?)
    }
}

impl ChallengeGenerator for GeminiClient {
    async fn generate_challenge(
        &self,
        media: MediaType,
        difficulty: Difficulty,
    ) -> Result<Challenge, ProviderError> {
        let model = &self.config.settings().challenge_model;
        tracing::info!(model = %model, %media, %difficulty, "Generating challenge");
        let body = challenge_body(media, difficulty);
        let response = self.generate_content(model, &body).await?;
        parse_challenge(&response.text()?, media, difficulty)
    }
}

impl VisualGenerator for GeminiClient {
    async fn generate_visual(&self, prompt: &str) -> Result<ImageRef, ProviderError> {
        let model = &self.config.settings().image_model;
        tracing::info!(model = %model, "Generating visual");
        let body = visual_body(prompt);
        let response = self.generate_content(model, &body).await?;
        let inline = response.first_inline_data()?;
        let mime_type = inline
            .mime_type
            .as_deref()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        Ok(ImageRef::new(mime_type, inline.data.clone()))
    }
}
