//! Generative-model capabilities for AuthEase.
//!
//! Three capabilities are exposed as traits so the engine can run against
//! scripted fakes in tests:
//!
//! | trait | operation |
//! |-------|-----------|
//! | [`ContentClassifier`] | score one piece of content for authenticity signals |
//! | [`ChallengeGenerator`] | fabricate a human/AI pair for a game round |
//! | [`VisualGenerator`] | render an image from a text prompt |
//!
//! [`gemini::GeminiClient`] implements all three against the Gemini
//! `generateContent` REST endpoint. Transport retries live in [`retry`];
//! callers above this crate never re-issue a request.

pub mod gemini;
pub mod prompts;
pub mod response;
pub mod retry;
pub mod schema;
pub mod visual;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;
use url::{Host, Url};

pub use authease_types;
use authease_types::{ApiKey, Challenge, Difficulty, ImageRef, MediaType, ScoreReport};

pub use gemini::GeminiClient;
pub use visual::resolve_visual_pair;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_CHALLENGE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("response blocked: {reason}")]
    Blocked { reason: String },
    #[error("model returned no content")]
    EmptyResponse,
    #[error("malformed {what}: {detail}")]
    Malformed { what: &'static str, detail: String },
    #[error("No image generated")]
    NoImage,
    #[error("HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProviderError {
    pub(crate) fn malformed(what: &'static str, detail: impl ToString) -> Self {
        Self::Malformed {
            what,
            detail: detail.to_string(),
        }
    }

    /// HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("base URL '{0}' must use https (plain http is only allowed for loopback hosts)")]
    InsecureBaseUrl(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Model names and transport knobs for the Gemini client.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub analysis_model: String,
    pub challenge_model: String,
    pub image_model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            challenge_model: DEFAULT_CHALLENGE_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: retry::RetryConfig::default().max_retries,
        }
    }
}

/// Validated key plus settings.
///
/// The base URL must be https unless it points at a loopback host, which is
/// how the integration tests reach a local mock server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    api_key: ApiKey,
    settings: GeminiSettings,
    base_url: String,
    loopback: bool,
}

impl ApiConfig {
    pub fn new(api_key: ApiKey, settings: GeminiSettings) -> Result<Self, ApiConfigError> {
        let raw = settings.base_url.trim();
        let parsed = Url::parse(raw).map_err(|e| ApiConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        let loopback = is_loopback(&parsed);
        match parsed.scheme() {
            "https" => {}
            "http" if loopback => {}
            "http" => return Err(ApiConfigError::InsecureBaseUrl(raw.to_string())),
            other => {
                return Err(ApiConfigError::InvalidBaseUrl {
                    url: raw.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                });
            }
        }
        let base_url = raw.trim_end_matches('/').to_string();
        Ok(Self {
            api_key,
            settings,
            base_url,
            loopback,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    #[must_use]
    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        self.loopback
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Build the HTTP client used for every Gemini call.
///
/// No redirects, bounded connect time, keepalive and a modest idle pool.
/// `https_only` is relaxed for loopback base URLs.
pub fn http_client(config: &ApiConfig) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(config.settings().request_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .https_only(!config.is_loopback())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .build()
        .map_err(ProviderError::Client)
}

/// Read an error body, truncated to 32 KiB.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

// ============================================================================
// Capabilities
// ============================================================================

/// Content submitted for classification.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaPayload {
    /// Typed input: free text or a URL.
    Typed { media: MediaType, content: String },
    /// File bytes, base64-encoded.
    Inline {
        media: MediaType,
        mime_type: String,
        data: String,
    },
}

impl MediaPayload {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Typed {
            media: MediaType::Text,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn url(content: impl Into<String>) -> Self {
        Self::Typed {
            media: MediaType::Url,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn inline(media: MediaType, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Inline {
            media,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    #[must_use]
    pub const fn media(&self) -> MediaType {
        match self {
            Self::Typed { media, .. } | Self::Inline { media, .. } => *media,
        }
    }
}

impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed { media, content } => f
                .debug_struct("Typed")
                .field("media", media)
                .field("chars", &content.chars().count())
                .finish(),
            Self::Inline {
                media,
                mime_type,
                data,
            } => f
                .debug_struct("Inline")
                .field("media", media)
                .field("mime_type", mime_type)
                .field("base64_len", &data.len())
                .finish(),
        }
    }
}

pub trait ContentClassifier: Send + Sync {
    fn classify(
        &self,
        payload: MediaPayload,
    ) -> impl Future<Output = Result<ScoreReport, ProviderError>> + Send;
}

pub trait ChallengeGenerator: Send + Sync {
    fn generate_challenge(
        &self,
        media: MediaType,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<Challenge, ProviderError>> + Send;
}

pub trait VisualGenerator: Send + Sync {
    fn generate_visual(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<ImageRef, ProviderError>> + Send;
}
