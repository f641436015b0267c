//! Media files in and out.
//!
//! Analysis of image, audio and video content sends the file inline as
//! base64 with a MIME type taken from the extension. Generated challenge
//! images are written back out so a terminal user can open them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use authease_providers::MediaPayload;
use authease_types::{ImageRef, MediaType};

/// Gemini rejects inline request payloads above 20 MB.
pub const MAX_INLINE_BYTES: u64 = 20 * 1024 * 1024;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

const AUDIO_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mp3"),
    ("aiff", "audio/aiff"),
    ("aif", "audio/aiff"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
];

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("flv", "video/x-flv"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    ("3gp", "video/3gpp"),
];

#[derive(Debug, Error)]
pub enum MediaLoadError {
    #[error("{media} content is typed, not loaded from a file")]
    NotAFileType { media: MediaType },
    #[error("unsupported {media} file type '.{extension}' ({})", path.display())]
    UnsupportedType {
        media: MediaType,
        extension: String,
        path: PathBuf,
    },
    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },
    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },
    #[error("{} is {size} bytes; the inline limit is {MAX_INLINE_BYTES}", path.display())]
    TooLarge { path: PathBuf, size: u64 },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// MIME type for a file of the given media kind, by extension.
#[must_use]
pub fn mime_for(media: MediaType, path: &Path) -> Option<&'static str> {
    let table = match media {
        MediaType::Image => IMAGE_TYPES,
        MediaType::Audio => AUDIO_TYPES,
        MediaType::Video => VIDEO_TYPES,
        MediaType::Text | MediaType::Url => return None,
    };
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    table
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Expand a leading `~/` and strip surrounding quotes left by drag-and-drop.
#[must_use]
pub fn resolve_input_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if let Some(rest) = trimmed.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(trimmed)
}

/// Read a media file into an inline payload.
pub fn load_media_file(media: MediaType, path: &Path) -> Result<MediaPayload, MediaLoadError> {
    if media.takes_typed_input() {
        return Err(MediaLoadError::NotAFileType { media });
    }
    let mime_type = mime_for(media, path).ok_or_else(|| MediaLoadError::UnsupportedType {
        media,
        extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
    })?;

    let read_err = |source| MediaLoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(path).map_err(read_err)?;
    if !metadata.is_file() {
        return Err(MediaLoadError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let size = metadata.len();
    if size == 0 {
        return Err(MediaLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    if size > MAX_INLINE_BYTES {
        return Err(MediaLoadError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    let bytes = fs::read(path).map_err(read_err)?;
    tracing::info!(
        %media,
        mime_type,
        bytes = bytes.len(),
        "Loaded media file for analysis"
    );
    Ok(MediaPayload::inline(media, mime_type, STANDARD.encode(bytes)))
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    IMAGE_TYPES
        .iter()
        .find(|(_, mime)| *mime == mime_type)
        .map_or("png", |(ext, _)| *ext)
}

/// `~/.authease/renders`
#[must_use]
pub fn renders_dir() -> Option<PathBuf> {
    authease_config::app_dir().map(|dir| dir.join("renders"))
}

/// Decode an image and write it to `dir/{timestamp}-{stem}.{ext}`.
pub fn export_image(image: &ImageRef, dir: &Path, stem: &str) -> Result<PathBuf, ExportError> {
    let bytes = STANDARD.decode(image.data.trim())?;
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!(
        "{timestamp}-{stem}.{}",
        extension_for_mime(&image.mime_type)
    ));

    let write_err = |source| ExportError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(write_err)?;
    fs::write(&path, &bytes).map_err(write_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Exported image");
    Ok(path)
}
