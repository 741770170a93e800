//! Media converter and media downloader.

use reqwest::multipart::Form;
use serde::Serialize;
use toolhub_core::platform::{MediaPlatform, DEFAULT_YOUTUBE_QUALITY};
use toolhub_core::selection::{ConversionType, FileSelection};
use toolhub_core::types::JobId;
use toolhub_core::validation::{
    require, validate_upload_size, validate_url, MAX_MEDIA_UPLOAD_BYTES, MSG_NO_FILES_TO_CONVERT,
    MSG_NO_URL, MSG_VIDEO_TOO_LARGE,
};

use crate::api::{file_part, ApiError, ToolhubApi};

pub const DEFAULT_BITRATE: &str = "192k";
pub const DEFAULT_DOWNLOAD_FORMAT: &str = "video";

/// A media download request.
#[derive(Debug, Clone)]
pub struct MediaDownload {
    pub platform: MediaPlatform,
    pub url: String,
    /// `video` or `audio`.
    pub format: String,
    /// Only sent for YouTube.
    pub quality: Option<String>,
}

impl MediaDownload {
    pub fn new(platform: MediaPlatform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
            format: DEFAULT_DOWNLOAD_FORMAT.to_string(),
            quality: platform
                .accepts_quality()
                .then(|| DEFAULT_YOUTUBE_QUALITY.to_string()),
        }
    }
}

#[derive(Serialize)]
struct DownloadRequest<'a> {
    url: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
}

impl ToolhubApi {
    /// Upload the selected files for conversion. Polled at the converter's
    /// faster cadence.
    pub async fn convert(
        &self,
        selection: &FileSelection,
        conversion: ConversionType,
        bitrate: &str,
    ) -> Result<JobId, ApiError> {
        require(!selection.is_empty(), MSG_NO_FILES_TO_CONVERT)?;

        let mut form = Form::new();
        for file in selection.files() {
            validate_upload_size(file.size, MAX_MEDIA_UPLOAD_BYTES, MSG_VIDEO_TOO_LARGE)?;
            form = form.part("files[]", file_part(&file.path).await?);
        }
        let form = form
            .text("bitrate", bitrate.to_string())
            .text("conversion_type", conversion.as_str());

        tracing::debug!(
            files = selection.len(),
            bytes = selection.total_bytes(),
            conversion = conversion.as_str(),
            "Submitting conversion",
        );
        self.start_multipart_job("/upload", form, "Failed to start conversion")
            .await
    }

    /// Start a download from a video platform.
    pub async fn download_media(&self, request: &MediaDownload) -> Result<JobId, ApiError> {
        let url = validate_url(&request.url, MSG_NO_URL)?;
        let quality = request
            .quality
            .as_deref()
            .filter(|_| request.platform.accepts_quality());
        let body = DownloadRequest {
            url,
            format: &request.format,
            quality,
        };

        self.start_json_job(
            &request.platform.endpoint(),
            &body,
            &request.platform.start_failure_message(),
        )
        .await
    }
}
