//! Turns a finished poll into what the user sees.

use serde::Serialize;
use toolhub_core::job::{is_download_type, ToolKind};
use toolhub_core::types::JobId;

use crate::poller::PollOutcome;
use crate::schemas::JobResult;

/// Message shown when the poll budget runs out.
pub const MSG_TIMED_OUT: &str = "Timed out waiting for the job to finish";

/// Terminal view of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Follow-up job whose only product is a file: fetch it right away.
    Download { url: String, message: String },
    /// Results to display, with an optional artifact link.
    Results {
        result: JobResult,
        download_url: Option<String>,
        message: String,
    },
    Error { message: String },
    Cancelled { message: String },
    TimedOut { message: String },
    /// Stopped locally; nothing to show.
    Aborted,
}

impl RenderOutcome {
    /// The user-facing text, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Download { message, .. }
            | Self::Results { message, .. }
            | Self::Error { message }
            | Self::Cancelled { message }
            | Self::TimedOut { message } => Some(message),
            Self::Aborted => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Download { .. } | Self::Results { .. })
    }
}

/// Relative path of a job's artifact.
pub fn download_path(job_id: &JobId) -> String {
    format!("/download/{job_id}")
}

/// Map a poll outcome for a job started by `tool` to its terminal view.
pub fn render(tool: ToolKind, job_id: &JobId, outcome: &PollOutcome) -> RenderOutcome {
    match outcome {
        PollOutcome::Completed(status) if is_download_type(status.job_type.as_deref()) => {
            RenderOutcome::Download {
                url: download_path(job_id),
                message: status
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Download ready".to_string()),
            }
        }
        PollOutcome::Completed(status) => {
            let result = JobResult::from_status(tool, status);
            let download_url = result.has_artifact().then(|| download_path(job_id));
            let message = match &result {
                JobResult::Subtitles(r) => r.details(),
                _ => status
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Complete!".to_string()),
            };
            RenderOutcome::Results {
                result,
                download_url,
                message,
            }
        }
        PollOutcome::Failed(status) => RenderOutcome::Error {
            message: status.failure_message(tool),
        },
        PollOutcome::Cancelled(status) => RenderOutcome::Cancelled {
            message: status.cancellation_message(),
        },
        PollOutcome::TimedOut { .. } => RenderOutcome::TimedOut {
            message: MSG_TIMED_OUT.to_string(),
        },
        PollOutcome::Aborted => RenderOutcome::Aborted,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use toolhub_core::job::JobStatus;

    use super::*;
    use crate::schemas::StatusResponse;

    fn completed(value: serde_json::Value) -> PollOutcome {
        PollOutcome::Completed(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn follow_up_jobs_become_downloads() {
        let id = JobId::new("abc");
        let out = render(
            ToolKind::DuplicateFinder,
            &id,
            &completed(json!({"status": "completed", "type": "clean_folder"})),
        );
        assert_eq!(
            out,
            RenderOutcome::Download {
                url: "/download/abc".into(),
                message: "Download ready".into()
            }
        );
    }

    #[test]
    fn converter_result_links_artifact() {
        let id = JobId::new("c1");
        let out = render(
            ToolKind::MediaConverter,
            &id,
            &completed(json!({"status": "completed", "filename": "a.mp3", "is_zip": false})),
        );
        let RenderOutcome::Results { result, download_url, .. } = out else {
            panic!("expected results");
        };
        assert!(matches!(result, JobResult::MediaConversion(_)));
        assert_eq!(download_url.as_deref(), Some("/download/c1"));
    }

    #[test]
    fn duplicate_scan_has_no_artifact() {
        let out = render(
            ToolKind::DuplicateFinder,
            &JobId::new("d"),
            &completed(json!({"status": "completed", "duplicate_groups": [], "unique_files": []})),
        );
        let RenderOutcome::Results { download_url, .. } = out else {
            panic!("expected results");
        };
        assert_eq!(download_url, None);
    }

    #[test]
    fn failures_and_cancellations() {
        let id = JobId::new("x");
        let failed = PollOutcome::Failed(
            StatusResponse::processing(0.0, "").with_status(JobStatus::Failed),
        );
        assert_eq!(
            render(ToolKind::GifMaker, &id, &failed).message(),
            Some("GIF generation failed")
        );

        let cancelled = PollOutcome::Cancelled(
            StatusResponse::processing(0.0, "Stopped by user").with_status(JobStatus::Cancelled),
        );
        assert_eq!(
            render(ToolKind::MediaDownloader, &id, &cancelled),
            RenderOutcome::Cancelled { message: "Stopped by user".into() }
        );

        let timed_out = PollOutcome::TimedOut {
            attempts: 3,
            elapsed: std::time::Duration::from_secs(3),
        };
        assert_eq!(render(ToolKind::GifMaker, &id, &timed_out).message(), Some(MSG_TIMED_OUT));
        assert!(!render(ToolKind::GifMaker, &id, &PollOutcome::Aborted).is_success());
    }
}
