//! Watermark remover.

use std::path::Path;

use serde::Serialize;
use toolhub_core::validation::{
    require, validate_upload_size, MAX_WATERMARK_IMAGE_BYTES, MSG_IMAGE_TOO_LARGE,
    MSG_NO_WATERMARK_MASK,
};

use super::{decode_inline_image, encode_data_url, image_mime};
use crate::api::{file_size, ApiError, ToolhubApi};
use crate::schemas::WatermarkResponse;

/// Inpainting algorithm used to fill the masked area.
pub const DEFAULT_INPAINT_METHOD: &str = "telea";

const MSG_NO_RESULT: &str = "Watermark removal returned no image";

#[derive(Serialize)]
struct RemoveRequest<'a> {
    image: String,
    mask: String,
    method: &'a str,
}

impl WatermarkResponse {
    /// The cleaned image bytes.
    pub fn image(&self) -> Result<Vec<u8>, ApiError> {
        let data = self
            .result
            .as_deref()
            .ok_or_else(|| ApiError::Unsuccessful(MSG_NO_RESULT.to_string()))?;
        decode_inline_image(data)
    }
}

impl ToolhubApi {
    /// Remove the area painted in `mask` (a PNG, white over the watermark)
    /// from `image`.
    pub async fn remove_watermark(
        &self,
        image: &Path,
        mask_png: &[u8],
        method: &str,
    ) -> Result<WatermarkResponse, ApiError> {
        require(!mask_png.is_empty(), MSG_NO_WATERMARK_MASK)?;
        validate_upload_size(file_size(image).await?, MAX_WATERMARK_IMAGE_BYTES, MSG_IMAGE_TOO_LARGE)?;

        let bytes = tokio::fs::read(image).await.map_err(|e| ApiError::Io {
            path: image.to_path_buf(),
            source: e,
        })?;
        let body = RemoveRequest {
            image: encode_data_url(image_mime(image), &bytes),
            mask: encode_data_url("image/png", mask_png),
            method,
        };

        let reply: WatermarkResponse = self.post_json("/watermark/remove", &body).await?;
        if reply.result.is_none() {
            return Err(ApiError::Unsuccessful(MSG_NO_RESULT.to_string()));
        }
        Ok(reply)
    }
}
