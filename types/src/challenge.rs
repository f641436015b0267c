//! Game challenge types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Difficulty, MediaType};

/// Opaque challenge identifier supplied by the generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(String);

impl ChallengeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated image, kept as base64 payload plus MIME type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub mime_type: String,
    pub data: String,
}

impl ImageRef {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Approximate decoded size in bytes.
    #[must_use]
    pub fn approx_bytes(&self) -> usize {
        self.data.len() / 4 * 3
    }
}

// Image payloads run to megabytes; keep them out of logs.
impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.approx_bytes())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionContent {
    Text(String),
    Image(ImageRef),
}

impl OptionContent {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionContent::Text(text) => Some(text),
            OptionContent::Image(_) => None,
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            OptionContent::Text(_) => None,
            OptionContent::Image(image) => Some(image),
        }
    }
}

/// One side of a challenge. `is_ai` is ground truth and never inferred locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    content: OptionContent,
    is_ai: bool,
    explanation: String,
}

impl ChallengeOption {
    #[must_use]
    pub fn new(content: OptionContent, is_ai: bool, explanation: impl Into<String>) -> Self {
        Self {
            content,
            is_ai,
            explanation: explanation.into(),
        }
    }

    #[must_use]
    pub fn text(content: impl Into<String>, is_ai: bool, explanation: impl Into<String>) -> Self {
        Self::new(OptionContent::Text(content.into()), is_ai, explanation)
    }

    #[must_use]
    pub fn content(&self) -> &OptionContent {
        &self.content
    }

    #[must_use]
    pub const fn is_ai(&self) -> bool {
        self.is_ai
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Replace the content, keeping ground truth and explanation.
    #[must_use]
    pub fn with_content(self, content: OptionContent) -> Self {
        Self { content, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Choice::A => Choice::B,
            Choice::B => Choice::A,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One round's pair of options. Always complete: there is no partially built state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    id: ChallengeId,
    media: MediaType,
    difficulty: Difficulty,
    narrative: String,
    option_a: ChallengeOption,
    option_b: ChallengeOption,
}

impl Challenge {
    #[must_use]
    pub fn new(
        id: ChallengeId,
        media: MediaType,
        difficulty: Difficulty,
        narrative: impl Into<String>,
        option_a: ChallengeOption,
        option_b: ChallengeOption,
    ) -> Self {
        Self {
            id,
            media,
            difficulty,
            narrative: narrative.into(),
            option_a,
            option_b,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ChallengeId {
        &self.id
    }

    #[must_use]
    pub const fn media(&self) -> MediaType {
        self.media
    }

    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    #[must_use]
    pub fn option(&self, choice: Choice) -> &ChallengeOption {
        match choice {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
        }
    }

    #[must_use]
    pub fn options(&self) -> [(Choice, &ChallengeOption); 2] {
        [(Choice::A, &self.option_a), (Choice::B, &self.option_b)]
    }

    /// Split into parts so a caller can swap option content (e.g. prompts for images).
    #[must_use]
    pub fn into_options(self) -> (ChallengeOption, ChallengeOption) {
        (self.option_a, self.option_b)
    }
}
