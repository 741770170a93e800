//! GIF maker.

use std::path::PathBuf;

use reqwest::multipart::Form;
use toolhub_core::error::CoreError;
use toolhub_core::types::JobId;
use toolhub_core::validation::{MAX_MEDIA_UPLOAD_BYTES, MSG_NO_VIDEO, MSG_VIDEO_TOO_LARGE};

use super::limited_part;
use crate::api::{ApiError, ToolhubApi};

/// Text drawn over the GIF.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub position: String,
    pub size: u32,
    pub color: String,
    pub background: String,
}

#[derive(Debug, Clone)]
pub struct GifRequest {
    pub video: Option<PathBuf>,
    /// Seconds into the video.
    pub start_time: f64,
    /// Seconds of video to convert.
    pub duration: f64,
    pub width: u32,
    pub fps: u32,
    pub quality: String,
    /// Loop count; 0 loops forever.
    pub loop_count: u32,
    pub caption: Option<Caption>,
}

impl GifRequest {
    pub fn new(video: impl Into<PathBuf>) -> Self {
        Self {
            video: Some(video.into()),
            start_time: 0.0,
            duration: 5.0,
            width: 640,
            fps: 15,
            quality: "medium".to_string(),
            loop_count: 0,
            caption: None,
        }
    }
}

impl ToolhubApi {
    /// Start a GIF job from a clip of a local video.
    pub async fn create_gif(&self, request: &GifRequest) -> Result<JobId, ApiError> {
        let video = request
            .video
            .as_deref()
            .ok_or_else(|| CoreError::Validation(MSG_NO_VIDEO.to_string()))?;

        let mut form = Form::new()
            .part("video", limited_part(video, MAX_MEDIA_UPLOAD_BYTES, MSG_VIDEO_TOO_LARGE).await?)
            .text("start_time", request.start_time.to_string())
            .text("duration", request.duration.to_string())
            .text("width", request.width.to_string())
            .text("fps", request.fps.to_string())
            .text("quality", request.quality.clone())
            .text("loop", request.loop_count.to_string());

        // Blank captions are not sent at all.
        if let Some(caption) = request.caption.as_ref().filter(|c| !c.text.trim().is_empty()) {
            form = form
                .text("caption_text", caption.text.trim().to_string())
                .text("caption_position", caption.position.clone())
                .text("caption_size", caption.size.to_string())
                .text("caption_color", caption.color.clone())
                .text("caption_bg", caption.background.clone());
        }

        self.start_multipart_job("/create-gif", form, "Failed to start GIF generation")
            .await
    }
}
