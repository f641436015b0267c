//! User-facing failure notices.
//!
//! Provider errors are turned into a short, sanitized, multi-line notice: a
//! headline, the cause, and a fix hint when the key was rejected.

use std::error::Error;
use std::fmt::Write;

use serde_json::Value;

use authease_providers::ProviderError;
use authease_types::{ApiKey, sanitize_terminal_text, truncate_with_ellipsis};

/// Headline for a failed game round.
pub const GAME_FAILURE_HEADLINE: &str = "Scenario synthesis interrupted. Rerouting to Terminal.";
/// Headline for a failed analysis.
pub const ANALYSIS_FAILURE_HEADLINE: &str = "Analysis failed.";

const MAX_DETAIL_CHARS: usize = 240;

/// Pull the human-readable message out of a Google API error body.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body.trim()).ok()?;
    payload
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/message").and_then(Value::as_str))
        .or_else(|| payload.as_str())
        .map(ToString::to_string)
}

#[must_use]
pub fn is_auth_error(status: Option<u16>, raw: &str) -> bool {
    if matches!(status, Some(401 | 403)) {
        return true;
    }
    let lower = raw.to_ascii_lowercase();
    let mentions_key = lower.contains("api key") || lower.contains("api_key");
    let auth_words = lower.contains("invalid")
        || lower.contains("not valid")
        || lower.contains("missing")
        || lower.contains("expired")
        || lower.contains("unauthorized");

    lower.contains("api_key_invalid") || (mentions_key && auth_words)
}

/// One-line cause for a provider error.
#[must_use]
pub fn describe_provider_error(err: &ProviderError) -> String {
    match err {
        ProviderError::Transport { attempts, source } => {
            format!("Could not reach Gemini after {attempts} attempt(s): {source}")
        }
        ProviderError::Api { status, body } => {
            let message = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());
            if message.is_empty() {
                format!("Gemini returned HTTP {status}.")
            } else {
                format!("Gemini returned HTTP {status}: {message}")
            }
        }
        ProviderError::Blocked { reason } => format!("The model declined the request: {reason}."),
        ProviderError::EmptyResponse => "The model returned an empty response.".to_string(),
        ProviderError::Malformed { what, .. } => {
            format!("The model returned an unusable {what}.")
        }
        ProviderError::NoImage => "No image generated.".to_string(),
        ProviderError::Client(e) => format!("HTTP client error: {e}"),
    }
}

/// Headline, cause, and an API key hint when authentication failed.
#[must_use]
pub fn format_failure_notice(headline: &str, err: &ProviderError) -> String {
    let detail = describe_provider_error(err);
    let detail = truncate_with_ellipsis(&sanitize_terminal_text(&detail), MAX_DETAIL_CHARS);

    let mut content = String::from(headline);
    content.push_str("\n\n");
    content.push_str(&detail);

    let raw = match err {
        ProviderError::Api { body, .. } => body.as_str(),
        _ => "",
    };
    if is_auth_error(err.status(), raw) {
        let config_hint = authease_config::config_path().map_or_else(
            || "~/.authease/config.toml".to_string(),
            |p| p.display().to_string(),
        );
        let _ = write!(
            content,
            "\n\nFix: set {} or add it to {config_hint} under [api_keys].google.",
            ApiKey::ENV_VARS[0]
        );
    }
    content
}

/// Headline plus an arbitrary error's message.
#[must_use]
pub fn format_error_notice(headline: &str, err: &dyn Error) -> String {
    let detail = truncate_with_ellipsis(&sanitize_terminal_text(&err.to_string()), MAX_DETAIL_CHARS);
    format!("{headline}\n\n{detail}")
}
