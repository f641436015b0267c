//! Typed `generateContent` response.
//!
//! Only the fields AuthEase reads are modelled; everything else is ignored.

use serde::Deserialize;

use crate::ProviderError;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// Known Gemini finish reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Blocklist,
    ProhibitedContent,
    Spii,
    ImageSafety,
    Other,
    Unknown,
}

impl FinishReason {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" => Self::Safety,
            "RECITATION" => Self::Recitation,
            "LANGUAGE" => Self::Language,
            "BLOCKLIST" => Self::Blocklist,
            "PROHIBITED_CONTENT" => Self::ProhibitedContent,
            "SPII" => Self::Spii,
            "IMAGE_SAFETY" => Self::ImageSafety,
            "OTHER" => Self::Other,
            _ => Self::Unknown,
        }
    }

    /// `None` when the candidate is usable.
    #[must_use]
    pub fn error_message(self) -> Option<&'static str> {
        match self {
            Self::Stop | Self::MaxTokens | Self::Unknown => None,
            Self::Safety => Some("content filtered by safety settings"),
            Self::Recitation => Some("recitation"),
            Self::Language => Some("unsupported language"),
            Self::Blocklist => Some("content contains blocked terms"),
            Self::ProhibitedContent => Some("prohibited content detected"),
            Self::Spii => Some("sensitive personal information detected"),
            Self::ImageSafety => Some("image filtered by safety settings"),
            Self::Other => Some("generation stopped for an unspecified reason"),
        }
    }
}

impl GenerateContentResponse {
    /// First candidate's parts after block and finish-reason checks.
    fn usable_parts(&self) -> Result<&[Part], ProviderError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(ProviderError::Blocked {
                reason: format!("prompt blocked ({reason})"),
            });
        }

        let candidate = self.candidates.first().ok_or(ProviderError::EmptyResponse)?;
        if let Some(message) = candidate
            .finish_reason
            .as_deref()
            .map(FinishReason::parse)
            .and_then(FinishReason::error_message)
        {
            return Err(ProviderError::Blocked {
                reason: message.to_string(),
            });
        }

        Ok(candidate
            .content
            .as_ref()
            .map_or(&[][..], |content| content.parts.as_slice()))
    }

    /// Concatenated non-thought text of the first candidate.
    pub fn text(&self) -> Result<String, ProviderError> {
        let text: String = self
            .usable_parts()?
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }

    /// First inline data part of the first candidate.
    pub fn first_inline_data(&self) -> Result<&InlineData, ProviderError> {
        self.usable_parts()?
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or(ProviderError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::{FinishReason, GenerateContentResponse};
    use crate::ProviderError;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_text_parts_and_skips_thoughts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"planning...","thought":true},
                {"text":"{\"a\":"},
                {"text":"1}"}
            ]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(response.text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn prompt_block_is_an_error() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(response.text(), Err(ProviderError::Blocked { .. })));
    }

    #[test]
    fn safety_finish_reason_is_an_error() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"x"}]},"finishReason":"SAFETY"}]}"#,
        );
        let Err(ProviderError::Blocked { reason }) = response.text() else {
            panic!("expected blocked");
        };
        assert!(reason.contains("safety"));
    }

    #[test]
    fn no_candidates_is_empty() {
        assert!(matches!(
            parse("{}").text(),
            Err(ProviderError::EmptyResponse)
        ));
        let blank = parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#);
        assert!(matches!(blank.text(), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn finds_inline_image_after_text() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is your image"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0K"}}
            ]}}]}"#,
        );
        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
        assert_eq!(inline.data, "iVBORw0K");
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#);
        assert!(matches!(
            response.first_inline_data(),
            Err(ProviderError::NoImage)
        ));
    }

    #[test]
    fn finish_reason_mapping() {
        assert!(FinishReason::parse("STOP").error_message().is_none());
        assert!(FinishReason::parse("MAX_TOKENS").error_message().is_none());
        assert!(FinishReason::parse("FUTURE_REASON").error_message().is_none());
        assert!(FinishReason::parse("RECITATION").error_message().is_some());
    }
}
