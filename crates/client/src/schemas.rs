//! Request and response bodies of the backend HTTP API.
//!
//! Status payloads are open-ended: the common fields are typed, everything
//! else is kept in [`StatusResponse::payload`] and decoded into a
//! [`JobResult`] once the job completes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolhub_core::duplicates::{DuplicateGroup, ExcelDuplicateGroup, ScanSummary};
use toolhub_core::format::format_megabytes;
use toolhub_core::history::{HistoryRecord, HistoryStatistics};
use toolhub_core::job::{JobStatus, ToolKind};
use toolhub_core::progress::ProgressView;
use toolhub_core::types::JobId;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Body of a 2xx reply from a start endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartJobResponse {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error fields the backend puts in a rejection body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of the synchronous endpoints that carry a `success` flag.
#[derive(Debug, Clone, Deserialize)]
pub struct Flagged<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Transfer figures reported by subtitle downloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub downloaded: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub eta: Option<String>,
}

impl DownloadInfo {
    /// Cells as displayed, with placeholders for missing figures.
    pub fn display(&self) -> [String; 4] {
        [
            self.downloaded.clone().unwrap_or_else(|| "0 MB".to_string()),
            self.total.clone().unwrap_or_else(|| "-- MB".to_string()),
            self.speed.clone().unwrap_or_else(|| "-- MB/s".to_string()),
            self.eta.clone().unwrap_or_else(|| "--:--".to_string()),
        ]
    }
}

/// Body of `GET /status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Discriminator for follow-up jobs (`clean_folder`, `excel_export`).
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub downloaded_mb: Option<f64>,
    #[serde(default)]
    pub total_mb: Option<f64>,
    #[serde(default)]
    pub can_cancel: bool,
    /// Tool-specific fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl StatusResponse {
    pub fn processing(progress: f64, message: &str) -> Self {
        Self {
            status: JobStatus::Processing,
            progress: Some(progress),
            message: Some(message.to_string()),
            error: None,
            job_type: None,
            downloaded_mb: None,
            total_mb: None,
            can_cancel: false,
            payload: Map::new(),
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Progress bar state for this observation.
    pub fn progress_view(&self, tool: ToolKind) -> ProgressView {
        let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);
        ProgressView::from_status(self.progress, self.message.as_deref(), tool.progress_fallback())
            .with_transfer(positive(self.downloaded_mb), positive(self.total_mb))
    }

    /// Text shown for a failed job. The converter reports through `error`,
    /// every other tool through `message`.
    pub fn failure_message(&self, tool: ToolKind) -> String {
        let (first, second) = match tool {
            ToolKind::MediaConverter => (&self.error, &self.message),
            _ => (&self.message, &self.error),
        };
        first
            .as_deref()
            .or(second.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(tool.failure_fallback())
            .to_string()
    }

    /// Text shown for a cancelled job.
    pub fn cancellation_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Download cancelled".to_string())
    }

    /// Whether the view should offer a cancel button right now.
    pub fn cancellable(&self) -> bool {
        self.status == JobStatus::Processing && self.can_cancel
    }

    pub fn download_info(&self) -> Option<DownloadInfo> {
        self.field("download_info")
    }

    /// Decode one tool-specific field. `None` when absent, null or of the
    /// wrong shape.
    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.payload
            .get(name)
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(Value::Object(self.payload.clone())).ok()
    }
}

// ---------------------------------------------------------------------------
// Completed job results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateScanResult {
    #[serde(default)]
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Files that would survive a clean-folder export.
    #[serde(default)]
    pub unique_files: Vec<Value>,
}

impl DuplicateScanResult {
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_groups(&self.duplicate_groups)
    }

    /// A clean folder can only be built when the scan found unique files.
    pub fn can_create_clean_folder(&self) -> bool {
        !self.unique_files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetScanResult {
    #[serde(default)]
    pub duplicate_records: u64,
    #[serde(default)]
    pub unique_records: u64,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub duplicate_groups: Vec<ExcelDuplicateGroup>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub output_filename: Option<String>,
}

impl SpreadsheetScanResult {
    /// A cleaned copy is offered automatically when the backend wrote one.
    pub fn has_cleaned_file(&self) -> bool {
        self.output_path.is_some() && self.output_filename.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub is_zip: bool,
}

impl ConversionResult {
    pub fn download_label(&self) -> &'static str {
        if self.is_zip {
            "Download ZIP File"
        } else {
            "Download File"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDownloadResult {
    #[serde(default)]
    pub output_filename: Option<String>,
    #[serde(default)]
    pub is_zip: bool,
}

impl MediaDownloadResult {
    pub fn display_filename(&self) -> &str {
        self.output_filename.as_deref().unwrap_or("Downloaded file")
    }

    pub fn note(&self) -> Option<&'static str> {
        self.is_zip.then_some("Multiple files packaged in ZIP archive")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleResult {
    #[serde(default)]
    pub subtitle_count: Option<u32>,
    #[serde(default)]
    pub is_zip: bool,
}

impl SubtitleResult {
    /// e.g. `Successfully downloaded with subtitles (2 languages) - ZIP file ready`.
    pub fn details(&self) -> String {
        let mut details = "Successfully downloaded with subtitles".to_string();
        if let Some(n) = self.subtitle_count.filter(|n| *n > 0) {
            details.push_str(&format!(" ({n} language{})", if n > 1 { "s" } else { "" }));
        }
        if self.is_zip {
            details.push_str(" - ZIP file ready");
        }
        details
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioResult {
    #[serde(default)]
    pub output_filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl AudioResult {
    pub fn size_label(&self) -> String {
        format_megabytes(self.file_size.unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GifResult {
    #[serde(default)]
    pub output_filename: Option<String>,
}

/// Typed result of a completed job, chosen by the tool that started it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobResult {
    DuplicateScan(DuplicateScanResult),
    SpreadsheetScan(SpreadsheetScanResult),
    MediaConversion(ConversionResult),
    MediaDownload(MediaDownloadResult),
    Subtitles(SubtitleResult),
    AudioEnhancement(AudioResult),
    Gif(GifResult),
    /// Payload that did not match the tool's expected shape.
    Generic(Map<String, Value>),
}

impl JobResult {
    pub fn from_status(tool: ToolKind, status: &StatusResponse) -> Self {
        let typed = match tool {
            ToolKind::DuplicateFinder => status.payload_as().map(Self::DuplicateScan),
            ToolKind::SpreadsheetDuplicates => status.payload_as().map(Self::SpreadsheetScan),
            ToolKind::MediaConverter => status.payload_as().map(Self::MediaConversion),
            ToolKind::MediaDownloader => status.payload_as().map(Self::MediaDownload),
            ToolKind::Subtitles => status.payload_as().map(Self::Subtitles),
            ToolKind::AudioEnhancer => status.payload_as().map(Self::AudioEnhancement),
            ToolKind::GifMaker => status.payload_as().map(Self::Gif),
        };
        typed.unwrap_or_else(|| Self::Generic(status.payload.clone()))
    }

    /// Whether the result is fetched through `/download/{job_id}`.
    pub fn has_artifact(&self) -> bool {
        match self {
            Self::DuplicateScan(_) | Self::Generic(_) => false,
            Self::SpreadsheetScan(r) => r.has_cleaned_file(),
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Synchronous tool replies
// ---------------------------------------------------------------------------

/// Reply of `/encrypt-file` and `/decrypt-file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoResponse {
    pub download_url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Acknowledgement of `/delete-duplicates` and `/cancel/{job_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Reply of the QR endpoints. `qr_code` is a base64-encoded PNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrResponse {
    pub qr_code: String,
}

/// Reply of `/watermark/remove`. `result` is an image data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkResponse {
    #[serde(default)]
    pub result: Option<String>,
}

/// Reply of `GET /api/history` and the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryListing {
    #[serde(default)]
    pub downloads: Vec<HistoryRecord>,
    #[serde(default)]
    pub statistics: Option<HistoryStatistics>,
}

/// Reply of `POST /api/history/redownload/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedownloadResponse {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub format_type: Option<String>,
}

/// Reply of `GET /api/server-info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub local_ip: String,
    pub network_url: String,
}
