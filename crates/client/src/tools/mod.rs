//! Per-tool operations.
//!
//! Each submodule adds an `impl ToolhubApi` block for one tool page. Every
//! operation checks its input before a request is built; a rejected input
//! never reaches the network.

pub mod analysis;
pub mod audio;
pub mod crypto;
pub mod duplicates;
pub mod gif;
pub mod history;
pub mod media;
pub mod qr;
pub mod server;
pub mod subtitles;
pub mod watermark;

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::multipart::Part;
use toolhub_core::validation::validate_upload_size;

use crate::api::{file_part, file_size, ApiError};

/// Size-check a local file, then read it into a multipart part.
pub(crate) async fn limited_part(path: &Path, max_bytes: u64, message: &str) -> Result<Part, ApiError> {
    validate_upload_size(file_size(path).await?, max_bytes, message)?;
    file_part(path).await
}

/// `data:{mime};base64,...` for an inline upload.
pub(crate) fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode an inline image that is either bare base64 or a base64 data URL.
pub fn decode_inline_image(data: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match data.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data,
    };
    Ok(STANDARD.decode(payload.trim())?)
}

/// Image MIME type guessed from a file extension.
pub(crate) fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/png",
    }
}
