//! File encryptor.

use std::path::Path;

use reqwest::multipart::Form;
use toolhub_core::error::CoreError;
use toolhub_core::validation::{validate_crypto_input, MSG_CRYPTO_MISSING_INPUT};

use crate::api::{file_part, ApiError, ToolhubApi};
use crate::schemas::CryptoResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoMode {
    Encrypt,
    Decrypt,
}

impl CryptoMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            Self::Encrypt => "/encrypt-file",
            Self::Decrypt => "/decrypt-file",
        }
    }
}

impl ToolhubApi {
    /// Encrypt a file with a password. The reply links to the result.
    pub async fn encrypt(&self, file: Option<&Path>, password: &str) -> Result<CryptoResponse, ApiError> {
        self.crypt(CryptoMode::Encrypt, file, password).await
    }

    /// Decrypt a file produced by [`encrypt`](Self::encrypt).
    pub async fn decrypt(&self, file: Option<&Path>, password: &str) -> Result<CryptoResponse, ApiError> {
        self.crypt(CryptoMode::Decrypt, file, password).await
    }

    async fn crypt(
        &self,
        mode: CryptoMode,
        file: Option<&Path>,
        password: &str,
    ) -> Result<CryptoResponse, ApiError> {
        validate_crypto_input(file.is_some(), password)?;
        let file = file.ok_or_else(|| CoreError::Validation(MSG_CRYPTO_MISSING_INPUT.to_string()))?;

        let form = Form::new()
            .part("file", file_part(file).await?)
            .text("password", password.to_string())
            .text("mode", mode.as_str());

        let reply: CryptoResponse = self.post_multipart(mode.endpoint(), form).await?;
        tracing::info!(mode = mode.as_str(), filename = ?reply.filename, "File processed");
        Ok(reply)
    }
}
