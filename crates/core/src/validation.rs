//! Client-side input validation.
//!
//! Every check here runs before a request is built. A failure is returned as
//! `CoreError::Validation` carrying the exact text shown to the user.

use validator::ValidateUrl;

use crate::error::CoreError;
use crate::format::BYTES_PER_MB;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Per-file limit for media conversion, subtitle and GIF uploads.
pub const MAX_MEDIA_UPLOAD_BYTES: u64 = 500 * BYTES_PER_MB;
/// Per-file limit for audio enhancement uploads.
pub const MAX_AUDIO_UPLOAD_BYTES: u64 = 100 * BYTES_PER_MB;
/// Limit for images sent to the watermark remover.
pub const MAX_WATERMARK_IMAGE_BYTES: u64 = 10 * BYTES_PER_MB;

/// Shortest password accepted by the file encryptor.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Spreadsheet extensions accepted by the Excel duplicate finder.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_CRYPTO_MISSING_INPUT: &str = "Please select a file and enter a password";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 4 characters long";
pub const MSG_NO_FOLDER: &str = "Please select a folder to scan";
pub const MSG_NO_SPREADSHEET: &str = "Please select an Excel/CSV file";
pub const MSG_BAD_SPREADSHEET: &str = "Please select an Excel (.xlsx, .xls) or CSV file";
pub const MSG_NO_COLUMNS: &str = "Please select at least one column to check for duplicates";
pub const MSG_NO_FILES_TO_DELETE: &str = "Please select files to delete";
pub const MSG_NO_FILES_TO_CONVERT: &str = "Please select files to convert";
pub const MSG_NO_URL: &str = "Please enter a URL";
pub const MSG_INVALID_URL: &str = "Please enter a valid URL";
pub const MSG_NO_VIDEO: &str = "Please select a video file";
pub const MSG_NO_AUDIO: &str = "Please select an audio file first";
pub const MSG_AUDIO_TOO_LARGE: &str = "File size too large. Maximum size is 100MB";
pub const MSG_VIDEO_TOO_LARGE: &str = "File is too large. Maximum size is 500MB";
pub const MSG_IMAGE_TOO_LARGE: &str = "File size exceeds 10MB limit. Please choose a smaller image.";
pub const MSG_NO_LANGUAGES: &str = "Please select both video language and subtitle language";
pub const MSG_PRODUCT_REQUIRED: &str = "Product Name and SKU are required";
pub const MSG_NO_WATERMARK_MASK: &str = "Please select watermark areas by drawing on the image.";
pub const MSG_NO_SEARCH_NAME: &str = "Please enter a name, username, or keyword to search";
pub const MSG_NO_NEWS_NAME: &str = "Please enter a name to search for news";
pub const MSG_NO_TREND_KEYWORD: &str = "Please enter a keyword, hashtag, or topic to analyze";
pub const MSG_NO_HOOK: &str = "Please enter your hook/opening line";
pub const MSG_NO_VIDEO_URL: &str = "Please enter a video URL";

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Trim `value` and fail with `message` when nothing is left.
pub fn require_text<'a>(value: &'a str, message: &str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(trimmed)
}

/// Fail with `message` when `present` is false (no file picked, etc.).
pub fn require(present: bool, message: &str) -> Result<(), CoreError> {
    if !present {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(())
}

/// Encryptor input: a file and a password of at least four characters.
pub fn validate_crypto_input(has_file: bool, password: &str) -> Result<(), CoreError> {
    if !has_file || password.is_empty() {
        return Err(CoreError::Validation(MSG_CRYPTO_MISSING_INPUT.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(MSG_PASSWORD_TOO_SHORT.to_string()));
    }
    Ok(())
}

/// A non-empty, well-formed absolute URL. Returns the trimmed URL.
pub fn validate_url<'a>(url: &'a str, missing_message: &str) -> Result<&'a str, CoreError> {
    let url = require_text(url, missing_message)?;
    if !url.validate_url() {
        return Err(CoreError::Validation(MSG_INVALID_URL.to_string()));
    }
    Ok(url)
}

/// Reject a single upload above `max_bytes`.
pub fn validate_upload_size(size: u64, max_bytes: u64, message: &str) -> Result<(), CoreError> {
    if size > max_bytes {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(())
}

/// Per-file oversize message used when a multi-file selection skips a file.
pub fn oversize_file_message(name: &str) -> String {
    format!("File \"{name}\" is too large (max 500MB)")
}

/// Whether `file_name` carries one of the spreadsheet extensions
/// (case-insensitive).
pub fn is_spreadsheet(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

/// Spreadsheet upload check for the Excel duplicate finder.
pub fn validate_spreadsheet_name(file_name: &str) -> Result<(), CoreError> {
    if !is_spreadsheet(file_name) {
        return Err(CoreError::Validation(MSG_BAD_SPREADSHEET.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_requires_file_and_password() {
        let err = validate_crypto_input(false, "secret").unwrap_err();
        assert_eq!(err.user_message(), MSG_CRYPTO_MISSING_INPUT);

        let err = validate_crypto_input(true, "").unwrap_err();
        assert_eq!(err.user_message(), MSG_CRYPTO_MISSING_INPUT);
    }

    #[test]
    fn crypto_password_minimum_length() {
        let err = validate_crypto_input(true, "abc").unwrap_err();
        assert_eq!(err.user_message(), MSG_PASSWORD_TOO_SHORT);
        assert!(validate_crypto_input(true, "abcd").is_ok());
    }

    #[test]
    fn url_checks() {
        assert_eq!(
            validate_url("  ", MSG_NO_URL).unwrap_err().user_message(),
            MSG_NO_URL
        );
        assert_eq!(
            validate_url("not a url", MSG_NO_URL).unwrap_err().user_message(),
            MSG_INVALID_URL
        );
        assert_eq!(
            validate_url(" https://youtu.be/abc ", MSG_NO_URL).unwrap(),
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn upload_size_limit_is_inclusive() {
        assert!(validate_upload_size(MAX_AUDIO_UPLOAD_BYTES, MAX_AUDIO_UPLOAD_BYTES, "x").is_ok());
        assert!(validate_upload_size(MAX_AUDIO_UPLOAD_BYTES + 1, MAX_AUDIO_UPLOAD_BYTES, "x").is_err());
    }

    #[test]
    fn spreadsheet_extensions() {
        assert!(is_spreadsheet("report.XLSX"));
        assert!(is_spreadsheet("data.csv"));
        assert!(!is_spreadsheet("notes.txt"));
        assert!(!is_spreadsheet("xlsx"));
        assert_eq!(
            validate_spreadsheet_name("a.pdf").unwrap_err().user_message(),
            MSG_BAD_SPREADSHEET
        );
    }

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("  hi ", "m").unwrap(), "hi");
        assert!(require_text("", "m").is_err());
    }
}
