//! Events emitted by a [`JobPanel`](crate::panel::JobPanel).
//!
//! A panel broadcasts one `Started`, zero or more `Progress` and exactly
//! one `Finished` event per job it tracks. A job replaced by another one
//! finishes with [`RenderOutcome::Aborted`].

use serde::Serialize;
use toolhub_core::job::ToolKind;
use toolhub_core::progress::ProgressView;
use toolhub_core::types::JobId;

use crate::render::RenderOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// Polling began for a freshly submitted job.
    Started {
        job_id: JobId,
        tool: ToolKind,
        /// The view shown before the first status arrives.
        view: ProgressView,
    },

    /// A newer `processing` status was observed.
    Progress {
        job_id: JobId,
        view: ProgressView,
        /// Whether a cancel control should be shown.
        can_cancel: bool,
    },

    /// The job reached its terminal view.
    Finished {
        job_id: JobId,
        outcome: RenderOutcome,
    },
}

impl JobEvent {
    pub fn job_id(&self) -> &JobId {
        match self {
            Self::Started { job_id, .. }
            | Self::Progress { job_id, .. }
            | Self::Finished { job_id, .. } => job_id,
        }
    }
}
