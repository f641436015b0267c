//! Shared test utilities and fixtures
//!
//! A local wiremock server stands in for the Gemini `generateContent`
//! endpoint; the client reaches it over loopback http.

#![allow(dead_code)]

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use authease_providers::{
    ApiConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_IMAGE_MODEL, GeminiClient, GeminiSettings,
};
use authease_types::ApiKey;

pub const TEST_KEY: &str = "test-gemini-key";

/// Same default model for analysis and challenges.
pub const TEXT_MODEL: &str = DEFAULT_ANALYSIS_MODEL;
pub const IMAGE_MODEL: &str = DEFAULT_IMAGE_MODEL;

pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

pub fn endpoint(model: &str) -> String {
    format!("/models/{model}:generateContent")
}

/// Client pointed at the mock server.
pub fn client(server: &MockServer, max_retries: u32) -> GeminiClient {
    let settings = GeminiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(10),
        max_retries,
        ..GeminiSettings::default()
    };
    let key = ApiKey::new(TEST_KEY).expect("non-empty key");
    let config = ApiConfig::new(key, settings).expect("loopback http is allowed");
    GeminiClient::new(config).expect("http client")
}

/// Envelope carrying one text part, the way JSON-mode answers arrive.
pub fn text_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 42,
            "candidatesTokenCount": 17,
            "totalTokenCount": 59
        }
    })
}

/// Envelope carrying one inline image part.
pub fn image_envelope(mime_type: &str, bytes: &[u8]) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here is your image." },
                    { "inlineData": { "mimeType": mime_type, "data": STANDARD.encode(bytes) } }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn report_json(ai_synthetic_prob: f64) -> String {
    json!({
        "sourceCredibility": 0.7,
        "manipulationRisk": 0.2,
        "aiSyntheticProb": ai_synthetic_prob,
        "trustIndex": 0.65,
        "findings": ["Uniform sentence rhythm", "No named sources"],
        "explanation": "Reads like templated copy.",
        "metadata": { "forensicDetails": { "language": "en" } }
    })
    .to_string()
}

pub fn challenge_json(option_a: &str, option_b: &str, ai_is_a: bool) -> String {
    json!({
        "id": "ch-1",
        "narrative": "Two captions for the same photo. One was written by a model.",
        "optionA": {
            "content": option_a,
            "isAi": ai_is_a,
            "explanation": if ai_is_a { "Too polished." } else { "Typos and a local joke." }
        },
        "optionB": {
            "content": option_b,
            "isAi": !ai_is_a,
            "explanation": if ai_is_a { "Typos and a local joke." } else { "Too polished." }
        }
    })
    .to_string()
}

/// Answer every call to `model` with a JSON text part.
pub async fn mount_text(server: &MockServer, model: &str, text: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint(model)))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_envelope(text)))
        .mount(server)
        .await;
}

/// Answer image calls whose prompt contains `needle` with an inline PNG.
pub async fn mount_image_for(server: &MockServer, needle: &str, bytes: &[u8]) {
    Mock::given(method("POST"))
        .and(path(endpoint(IMAGE_MODEL)))
        .and(body_string_contains(needle))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(image_envelope("image/png", bytes)),
        )
        .mount(server)
        .await;
}

/// Answer image calls whose prompt contains `needle` with text only.
pub async fn mount_textual_image_for(server: &MockServer, needle: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint(IMAGE_MODEL)))
        .and(body_string_contains(needle))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_envelope("I can't draw that, but here's a poem.")),
        )
        .mount(server)
        .await;
}

/// Google-style error body.
pub async fn mount_error(server: &MockServer, model: &str, status: u16, message: &str, reason: &str) {
    let body = json!({
        "error": {
            "code": status,
            "message": message,
            "status": "INVALID_ARGUMENT",
            "details": [{ "reason": reason }]
        }
    });
    Mock::given(method("POST"))
        .and(path(endpoint(model)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
