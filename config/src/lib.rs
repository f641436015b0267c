//! Configuration for AuthEase, read from `~/.authease/config.toml`.
//!
//! A missing file is not an error: every field has a default. String values
//! may reference environment variables as `${VAR}`.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//!
//! [api_keys]
//! google = "${GEMINI_API_KEY}"
//!
//! [google]
//! analysis_model = "gemini-3-flash-preview"
//! challenge_model = "gemini-3-flash-preview"
//! image_model = "gemini-2.5-flash-image"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! request_timeout_secs = 120
//! max_retries = 2
//!
//! [game]
//! media = "text"
//! difficulty = "beginner"
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use authease_providers::GeminiSettings;
use authease_types::{ApiKey, Difficulty, EnumParseError, MediaType};

const APP_DIR: &str = ".authease";

#[derive(Debug, Default, Deserialize)]
pub struct AuthEaseConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
    pub google: Option<GoogleConfig>,
    pub game: Option<GameConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid [game] setting: {0}")]
    Value(#[from] EnumParseError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path.as_path()),
            ConfigError::Value(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub google: Option<String>,
}

// Keys must never reach the log file.
impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let google = if self.google.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("google", &google).finish()
    }
}

/// Gemini model and transport settings.
#[derive(Debug, Default, Deserialize)]
pub struct GoogleConfig {
    pub analysis_model: Option<String>,
    pub challenge_model: Option<String>,
    pub image_model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Starting choices for the game's settings screen.
#[derive(Debug, Default, Deserialize)]
pub struct GameConfig {
    pub media: Option<String>,
    pub difficulty: Option<String>,
}

impl GameConfig {
    pub fn media(&self) -> Result<MediaType, EnumParseError> {
        self.media
            .as_deref()
            .map_or(Ok(MediaType::default()), MediaType::parse)
    }

    pub fn difficulty(&self) -> Result<Difficulty, EnumParseError> {
        self.difficulty
            .as_deref()
            .map_or(Ok(Difficulty::default()), Difficulty::parse)
    }
}

/// Replace `${VAR}` with the variable's value. Unset variables become empty;
/// an unclosed `${` is kept verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| expand_env_vars(v.trim()))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AuthEaseConfig {
    /// Load from the default path. `Ok(None)` when no home dir or no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), %source, "Failed to read config");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), %source, "Failed to parse config");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.ascii_only)
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.high_contrast)
    }

    /// Configured key first, then `GEMINI_API_KEY`, then `API_KEY`.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<ApiKey> {
        self.resolve_api_key_with(|name| env::var(name).ok())
    }

    fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<ApiKey> {
        let configured = self
            .api_keys
            .as_ref()
            .and_then(|keys| keys.google.as_ref())
            .map(|raw| expand_with(raw.trim(), &env));
        configured
            .into_iter()
            .chain(ApiKey::ENV_VARS.iter().filter_map(|name| env(*name)))
            .find_map(|raw| ApiKey::new(raw).ok())
    }

    /// Gemini settings with defaults for anything unset.
    #[must_use]
    pub fn gemini_settings(&self) -> GeminiSettings {
        let mut settings = GeminiSettings::default();
        let Some(google) = &self.google else {
            return settings;
        };
        if let Some(model) = non_empty(google.analysis_model.as_ref()) {
            settings.analysis_model = model;
        }
        if let Some(model) = non_empty(google.challenge_model.as_ref()) {
            settings.challenge_model = model;
        }
        if let Some(model) = non_empty(google.image_model.as_ref()) {
            settings.image_model = model;
        }
        if let Some(url) = non_empty(google.base_url.as_ref()) {
            settings.base_url = url;
        }
        if let Some(secs) = google.request_timeout_secs.filter(|secs| *secs > 0) {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = google.max_retries {
            settings.max_retries = retries;
        }
        settings
    }

    /// Initial media type and difficulty for the game.
    pub fn game_defaults(&self) -> Result<(MediaType, Difficulty), ConfigError> {
        match &self.game {
            Some(game) => Ok((game.media()?, game.difficulty()?)),
            None => Ok((MediaType::default(), Difficulty::default())),
        }
    }
}

/// `~/.authease`
#[must_use]
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.toml"))
}
