//! Support logic shared by the AuthEase engine and front end:
//! failure notice formatting and media file handling.

pub mod errors;
pub mod media;

pub use errors::{
    ANALYSIS_FAILURE_HEADLINE, GAME_FAILURE_HEADLINE, format_error_notice, format_failure_notice,
};
pub use media::{
    ExportError, MediaLoadError, export_image, load_media_file, renders_dir, resolve_input_path,
};
