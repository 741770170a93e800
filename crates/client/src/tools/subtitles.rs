//! Subtitle downloader and video subtitle processing.
//!
//! Both operations start cancellable jobs.

use std::path::PathBuf;

use reqwest::multipart::Form;
use serde::Serialize;
use toolhub_core::error::CoreError;
use toolhub_core::types::JobId;
use toolhub_core::validation::{
    require, require_text, validate_url, MAX_MEDIA_UPLOAD_BYTES, MSG_NO_LANGUAGES, MSG_NO_URL,
    MSG_NO_VIDEO, MSG_VIDEO_TOO_LARGE,
};

use super::limited_part;
use crate::api::{file_part, flag, ApiError, ToolhubApi};

pub const DEFAULT_SUBTITLE_FORMAT: &str = "srt";

/// Subtitles for an online video.
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleDownload {
    pub url: String,
    pub source_language: String,
    pub target_language: String,
    /// `subs_only` or a video+subtitles bundle.
    pub download_type: String,
    pub subtitle_format: String,
    /// Always requested so videos without manual captions still work.
    pub auto_generated: bool,
    pub video_quality: String,
}

impl SubtitleDownload {
    pub fn new(
        url: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            download_type: "subs_only".to_string(),
            subtitle_format: DEFAULT_SUBTITLE_FORMAT.to_string(),
            auto_generated: true,
            video_quality: "best".to_string(),
        }
    }
}

/// What to do with an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleAction {
    /// Transcribe speech into subtitles.
    Generate,
    /// Mux the supplied subtitle files into the video.
    Add,
}

impl SubtitleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Add => "add",
        }
    }
}

/// Subtitles for a local video file.
#[derive(Debug, Clone)]
pub struct VideoSubtitles {
    pub video: PathBuf,
    pub languages: Vec<String>,
    pub action: SubtitleAction,
    pub subtitle_format: String,
    pub translate: bool,
    /// Uploaded only for [`SubtitleAction::Add`].
    pub subtitle_files: Vec<PathBuf>,
}

impl ToolhubApi {
    /// Start a subtitle download for an online video.
    pub async fn download_subtitles(&self, request: &SubtitleDownload) -> Result<JobId, ApiError> {
        let url = validate_url(&request.url, MSG_NO_URL)?;
        require_text(&request.source_language, MSG_NO_LANGUAGES)?;
        require_text(&request.target_language, MSG_NO_LANGUAGES)?;

        let body = SubtitleDownload {
            url: url.to_string(),
            ..request.clone()
        };
        self.start_json_job("/download-subtitles", &body, "Failed to start download")
            .await
    }

    /// Upload a video to generate or add subtitles.
    pub async fn process_video(&self, request: &VideoSubtitles) -> Result<JobId, ApiError> {
        require(!request.video.as_os_str().is_empty(), MSG_NO_VIDEO)?;
        require(!request.languages.is_empty(), MSG_NO_LANGUAGES)?;

        let languages = serde_json::to_string(&request.languages)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        let mut form = Form::new()
            .part("video", limited_part(&request.video, MAX_MEDIA_UPLOAD_BYTES, MSG_VIDEO_TOO_LARGE).await?)
            .text("languages", languages)
            .text("action_type", request.action.as_str())
            .text("subtitle_format", request.subtitle_format.clone())
            .text("translate", flag(request.translate));

        if request.action == SubtitleAction::Add {
            for path in &request.subtitle_files {
                form = form.part("subtitle_files", file_part(path).await?);
            }
        }

        self.start_multipart_job("/process-video-subtitles", form, "Failed to process video")
            .await
    }
}
