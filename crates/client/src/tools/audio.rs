//! Audio enhancer.

use std::path::PathBuf;

use reqwest::multipart::Form;
use toolhub_core::error::CoreError;
use toolhub_core::types::JobId;
use toolhub_core::validation::{MAX_AUDIO_UPLOAD_BYTES, MSG_AUDIO_TOO_LARGE, MSG_NO_AUDIO};

use super::limited_part;
use crate::api::{flag, ApiError, ToolhubApi};

#[derive(Debug, Clone)]
pub struct AudioEnhancement {
    pub audio: Option<PathBuf>,
    /// Noise reduction strength, e.g. `low`, `medium`, `high`.
    pub noise_reduction: String,
    pub enhance_voice: bool,
    pub normalize_audio: bool,
    pub remove_silence: bool,
}

impl AudioEnhancement {
    pub fn new(audio: impl Into<PathBuf>) -> Self {
        Self {
            audio: Some(audio.into()),
            noise_reduction: "medium".to_string(),
            enhance_voice: true,
            normalize_audio: true,
            remove_silence: false,
        }
    }
}

impl ToolhubApi {
    /// Start an enhancement job. Files above 100 MB are refused locally.
    pub async fn enhance_audio(&self, request: &AudioEnhancement) -> Result<JobId, ApiError> {
        let audio = request
            .audio
            .as_deref()
            .ok_or_else(|| CoreError::Validation(MSG_NO_AUDIO.to_string()))?;

        let form = Form::new()
            .part("audio", limited_part(audio, MAX_AUDIO_UPLOAD_BYTES, MSG_AUDIO_TOO_LARGE).await?)
            .text("noise_reduction", request.noise_reduction.clone())
            .text("enhance_voice", flag(request.enhance_voice))
            .text("normalize_audio", flag(request.normalize_audio))
            .text("remove_silence", flag(request.remove_silence));

        self.start_multipart_job("/api/enhance-audio", form, "Failed to start enhancement")
            .await
    }
}
