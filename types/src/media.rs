//! Media type and difficulty enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    MediaType,
    Difficulty,
}

impl EnumKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumKind::MediaType => "media type",
            EnumKind::Difficulty => "difficulty",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    kind: EnumKind,
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(kind: EnumKind, raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.into(),
            expected,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EnumKind {
        self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

const MEDIA_TYPE_VALUES: &[&str] = &["text", "image", "audio", "video", "url"];

/// Kind of content being analyzed or fabricated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Text,
    Image,
    Audio,
    Video,
    Url,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Url => "url",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MediaType::Text => "Text",
            MediaType::Image => "Image",
            MediaType::Audio => "Audio",
            MediaType::Video => "Video",
            MediaType::Url => "URL",
        }
    }

    /// Whether analysis input for this type is typed text rather than a file.
    #[must_use]
    pub const fn takes_typed_input(self) -> bool {
        matches!(self, MediaType::Text | MediaType::Url)
    }

    #[must_use]
    pub const fn all() -> &'static [MediaType] {
        &[
            MediaType::Text,
            MediaType::Image,
            MediaType::Audio,
            MediaType::Video,
            MediaType::Url,
        ]
    }

    /// The next type in tab order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        cycle(Self::all(), self, 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        cycle(Self::all(), self, Self::all().len() - 1)
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "text" => Ok(MediaType::Text),
            "image" => Ok(MediaType::Image),
            "audio" => Ok(MediaType::Audio),
            "video" => Ok(MediaType::Video),
            "url" => Ok(MediaType::Url),
            _ => Err(EnumParseError::new(
                EnumKind::MediaType,
                trimmed,
                MEDIA_TYPE_VALUES,
            )),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DIFFICULTY_VALUES: &[&str] = &["beginner", "intermediate", "advanced", "expert"];

/// Game difficulty. Each level carries the generation guideline sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    #[must_use]
    pub const fn guideline(self) -> &'static str {
        match self {
            Difficulty::Beginner => {
                "Obvious differences. AI has clear artifacts (e.g., garbled text, 6 fingers, repetitive phrases)."
            }
            Difficulty::Intermediate => {
                "Mixed AI-edited content. Content that is mostly real but has subtle AI touches or filters."
            }
            Difficulty::Advanced => {
                "Adversarial examples. AI content designed to mimic professional human work with high coherence."
            }
            Difficulty::Expert => {
                "Human-written but structured like AI. Extremely challenging cases where human quirkiness is minimized."
            }
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Expert,
        ]
    }

    /// Difficulty for a 1-based menu slot.
    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1)
            .and_then(|index| Self::all().get(index))
            .copied()
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(EnumParseError::new(
                EnumKind::Difficulty,
                trimmed,
                DIFFICULTY_VALUES,
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let index = all.iter().position(|item| *item == current).unwrap_or(0);
    all[(index + step) % all.len()]
}
