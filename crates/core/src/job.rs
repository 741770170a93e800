//! Job lifecycle model shared by every tool.
//!
//! A job is created by the backend when a tool's start endpoint accepts a
//! submission. The client only ever reads its state through
//! `GET /status/{job_id}`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status reported by the backend for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// A terminal status never transitions again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// Job type discriminators
// ---------------------------------------------------------------------------

/// Job created by `/create-clean-folder`; completion means "download the folder".
pub const JOB_TYPE_CLEAN_FOLDER: &str = "clean_folder";
/// Job created by `/export-excel-duplicates`; completion means "download the export".
pub const JOB_TYPE_EXCEL_EXPORT: &str = "excel_export";

/// Job types whose completion redirects straight to `/download/{job_id}`.
pub const DOWNLOAD_JOB_TYPES: &[&str] = &[JOB_TYPE_CLEAN_FOLDER, JOB_TYPE_EXCEL_EXPORT];

/// Whether a completed job of this `type` should be delivered as a download.
pub fn is_download_type(job_type: Option<&str>) -> bool {
    job_type.is_some_and(|t| DOWNLOAD_JOB_TYPES.contains(&t))
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// The tool that started a job. Determines how a completed status payload
/// is interpreted and which poll cadence the tool uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    DuplicateFinder,
    SpreadsheetDuplicates,
    MediaConverter,
    MediaDownloader,
    Subtitles,
    AudioEnhancer,
    GifMaker,
}

/// Poll cadence of the media converter page.
pub const FAST_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Poll cadence of every other page.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

impl ToolKind {
    /// Fixed polling period the tool uses while its job is processing.
    pub fn poll_interval(&self) -> Duration {
        match self {
            Self::MediaConverter => FAST_POLL_INTERVAL,
            _ => DEFAULT_POLL_INTERVAL,
        }
    }

    /// Only downloads (media and subtitles) can be cancelled by the user.
    pub fn supports_cancel(&self) -> bool {
        matches!(self, Self::MediaDownloader | Self::Subtitles)
    }

    /// Fallback text shown when a failed job carries no message.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Self::DuplicateFinder | Self::SpreadsheetDuplicates => "Operation failed",
            Self::MediaConverter => "Conversion failed",
            Self::MediaDownloader | Self::Subtitles => "Download failed",
            Self::AudioEnhancer => "Enhancement failed",
            Self::GifMaker => "GIF generation failed",
        }
    }

    /// Fallback progress message while a job is running.
    pub fn progress_fallback(&self) -> &'static str {
        match self {
            Self::DuplicateFinder | Self::SpreadsheetDuplicates => "Scanning...",
            _ => "Processing...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_deserializes_from_wire_names() {
        let s: JobStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s, JobStatus::Cancelled);
        assert_eq!(JobStatus::Processing.as_str(), "processing");
    }

    #[test]
    fn download_types_are_recognised() {
        assert!(is_download_type(Some("clean_folder")));
        assert!(is_download_type(Some("excel_export")));
        assert!(!is_download_type(Some("scan")));
        assert!(!is_download_type(None));
    }

    #[test]
    fn converter_polls_faster() {
        assert_eq!(ToolKind::MediaConverter.poll_interval(), Duration::from_millis(500));
        assert_eq!(ToolKind::GifMaker.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn only_downloads_are_cancellable() {
        assert!(ToolKind::MediaDownloader.supports_cancel());
        assert!(ToolKind::Subtitles.supports_cancel());
        assert!(!ToolKind::DuplicateFinder.supports_cancel());
    }
}
