//! Core domain types for AuthEase.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod challenge;
mod ids;
mod media;
mod progression;
mod report;
mod sanitize;
mod text;

pub use challenge::{Challenge, ChallengeId, ChallengeOption, Choice, ImageRef, OptionContent};
pub use ids::{RequestId, RoundId, Sequence};
pub use media::{Difficulty, EnumKind, EnumParseError, MediaType};
pub use progression::{
    CORRECT_ROUND_XP, ProgressionStats, RoundOutcome, XP_PER_LEVEL, accuracy_percent,
    level_for_xp, score,
};
pub use report::{Probabilities, ReportError, ScoreReport, Verdict, to_percent};
pub use sanitize::sanitize_terminal_text;
pub use text::truncate_with_ellipsis;

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ============================================================================
// API Key
// ============================================================================

/// Gemini API key. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(NonEmptyString);

impl ApiKey {
    /// Environment variables consulted, in order, when no key is configured.
    pub const ENV_VARS: &'static [&'static str] = &["GEMINI_API_KEY", "API_KEY"];

    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyStringError> {
        let raw = raw.into();
        NonEmptyString::new(raw.trim().to_string()).map(Self)
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}
