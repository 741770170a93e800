//! Download history records, statistics and client-side filtering.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::format::format_history_size;
use crate::types::HistoryId;

/// Status column of a history record. Unrecognised values are kept as
/// [`HistoryStatus::Other`] so a new backend state never breaks a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[serde(untagged)]
    Other(String),
}

/// One row of the download history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<HistoryStatus>,
    #[serde(default)]
    pub format_type: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Naive ISO-8601 local time as written by the backend.
    #[serde(default)]
    pub downloaded_date: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub is_playlist: bool,
    #[serde(default)]
    pub video_count: Option<u32>,
}

impl HistoryRecord {
    /// Title with the playlist marker; `Untitled Download` when missing.
    pub fn display_title(&self) -> String {
        let title = self
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled Download");
        if self.is_playlist {
            format!("📋 {title}")
        } else {
            title.to_string()
        }
    }

    pub fn size_label(&self) -> String {
        format_history_size(self.file_size)
    }

    /// Parsed download time. `None` when missing or not ISO-8601.
    pub fn downloaded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.downloaded_date.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    /// Page that shows progress for a re-download of this record.
    pub fn redownload_page(&self) -> RedownloadPage {
        RedownloadPage::for_format(self.format_type.as_deref())
    }
}

/// Aggregate figures returned alongside the listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStatistics {
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub total_size_mb: f64,
}

impl HistoryStatistics {
    /// Total size in gibibytes, two decimals (`1.50 GB`).
    pub fn total_size_label(&self) -> String {
        format!("{:.2} GB", self.total_size_mb / 1024.0)
    }
}

/// Status filter of the history view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    Status(HistoryStatus),
}

impl HistoryFilter {
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self {
            Self::All => true,
            Self::Status(s) => record.status.as_ref() == Some(s),
        }
    }

    pub fn apply<'a>(&self, records: &'a [HistoryRecord]) -> Vec<&'a HistoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Where the user follows a re-download's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedownloadPage {
    SubtitleDownloader,
    MediaConverter,
}

impl RedownloadPage {
    /// Subtitle formats (`...subs...` / `...subtitle...`) go to the subtitle
    /// page, everything else to the media page.
    pub fn for_format(format_type: Option<&str>) -> Self {
        let format_type = format_type.unwrap_or_default();
        if format_type.contains("subs") || format_type.contains("subtitle") {
            Self::SubtitleDownloader
        } else {
            Self::MediaConverter
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::SubtitleDownloader => "/tool/subtitle-downloader",
            Self::MediaConverter => "/tool/media-converter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: HistoryId, status: &str) -> HistoryRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("video {id}"),
            "status": status,
            "format_type": "video",
            "quality": "best",
            "file_size": 1048576,
            "downloaded_date": "2024-03-01T12:30:00.123456",
        }))
        .unwrap()
    }

    #[test]
    fn filter_by_status() {
        let records = vec![record(1, "completed"), record(2, "failed"), record(3, "completed")];

        assert_eq!(HistoryFilter::All.apply(&records).len(), 3);
        let completed = HistoryFilter::Status(HistoryStatus::Completed).apply(&records);
        assert_eq!(completed.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let r = record(1, "queued");
        assert_eq!(r.status, Some(HistoryStatus::Other("queued".to_string())));
        assert_eq!(record(2, "in_progress").status, Some(HistoryStatus::InProgress));
    }

    #[test]
    fn display_fields() {
        let mut r = record(4, "completed");
        assert_eq!(r.size_label(), "1.00 MB");
        assert!(r.downloaded_at().is_some());

        r.title = None;
        r.is_playlist = true;
        assert_eq!(r.display_title(), "📋 Untitled Download");
    }

    #[test]
    fn statistics_size_in_gigabytes() {
        let stats = HistoryStatistics {
            total_size_mb: 1536.0,
            ..Default::default()
        };
        assert_eq!(stats.total_size_label(), "1.50 GB");
    }

    #[test]
    fn redownload_routing() {
        assert_eq!(
            RedownloadPage::for_format(Some("subtitle_srt")),
            RedownloadPage::SubtitleDownloader
        );
        assert_eq!(RedownloadPage::for_format(Some("video+subs")).path(), "/tool/subtitle-downloader");
        assert_eq!(RedownloadPage::for_format(Some("audio")), RedownloadPage::MediaConverter);
        assert_eq!(RedownloadPage::for_format(None).path(), "/tool/media-converter");
    }
}
