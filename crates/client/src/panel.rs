//! Per-view job tracking.
//!
//! A [`JobPanel`] stands for one tool page: it remembers the job that page
//! last submitted and owns the single poll task following it. Starting a
//! new job on the panel stops the previous poll first, so a panel never
//! runs two polls at once. Independent panels share nothing and poll
//! concurrently.
//!
//! Progress and terminal views are broadcast as [`JobEvent`]s. Call
//! [`JobPanel::subscribe`] before [`JobPanel::start`] to see every event of
//! a job.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use toolhub_core::job::ToolKind;
use toolhub_core::progress::ProgressView;
use toolhub_core::types::JobId;

use crate::api::{ApiError, ToolhubApi};
use crate::config::ClientConfig;
use crate::events::JobEvent;
use crate::poller::{poll_job, PollConfig, StatusSource};
use crate::render::{render, RenderOutcome};
use crate::schemas::Ack;

/// Broadcast channel capacity for panel events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long a replaced or stopped poll task gets to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Message shown right after submission, before the first status arrives.
const STARTING_MESSAGE: &str = "Starting...";

pub struct JobPanel {
    source: Arc<dyn StatusSource>,
    tool: ToolKind,
    config: PollConfig,
    state: Mutex<PanelState>,
    event_tx: broadcast::Sender<JobEvent>,
    /// Master token, cancelled by [`JobPanel::shutdown`]. Each poll runs
    /// under a child of it.
    cancel: CancellationToken,
}

#[derive(Default)]
struct PanelState {
    job_id: Option<JobId>,
    live: Option<LivePoll>,
}

struct LivePoll {
    cancel: CancellationToken,
    /// Taken by [`JobPanel::wait`].
    handle: Option<JoinHandle<RenderOutcome>>,
}

/// Errors from misusing a panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("No job is being tracked")]
    NoActiveJob,

    #[error("This tool does not support cancellation")]
    NotCancellable,

    #[error("Poll task failed: {0}")]
    PollTaskFailed(String),

    #[error("Panel has been shut down")]
    ShutDown,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl JobPanel {
    pub fn new(source: Arc<dyn StatusSource>, tool: ToolKind, config: PollConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            tool,
            config,
            state: Mutex::new(PanelState::default()),
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// A panel polling `api` with the tool's configured cadence.
    pub fn for_api(api: Arc<ToolhubApi>, tool: ToolKind, config: &ClientConfig) -> Self {
        Self::new(api, tool, config.poll_config(tool))
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.event_tx.subscribe()
    }

    /// The job most recently started on this panel, until [`stop`](Self::stop).
    pub async fn current_job(&self) -> Option<JobId> {
        self.state.lock().await.job_id.clone()
    }

    /// Whether a poll task is still running.
    pub async fn is_polling(&self) -> bool {
        let state = self.state.lock().await;
        state
            .live
            .as_ref()
            .and_then(|live| live.handle.as_ref())
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Begin polling `job_id`, stopping any poll already running.
    pub async fn start(&self, job_id: JobId) -> Result<(), PanelError> {
        if self.cancel.is_cancelled() {
            return Err(PanelError::ShutDown);
        }

        let mut state = self.state.lock().await;
        if let Some(previous) = state.live.take() {
            tracing::info!(
                tool = ?self.tool,
                previous = ?state.job_id,
                next = %job_id,
                "Replacing live poll",
            );
            stop_poll(previous).await;
        }

        let poll_cancel = self.cancel.child_token();
        let _ = self.event_tx.send(JobEvent::Started {
            job_id: job_id.clone(),
            tool: self.tool,
            view: ProgressView::initial(STARTING_MESSAGE),
        });

        let handle = tokio::spawn(run_poll(
            Arc::clone(&self.source),
            self.tool,
            job_id.clone(),
            self.config.clone(),
            poll_cancel.clone(),
            self.event_tx.clone(),
        ));

        state.job_id = Some(job_id);
        state.live = Some(LivePoll {
            cancel: poll_cancel,
            handle: Some(handle),
        });
        Ok(())
    }

    /// Wait for the live poll to reach its terminal view.
    pub async fn wait(&self) -> Result<RenderOutcome, PanelError> {
        let handle = {
            let mut state = self.state.lock().await;
            state
                .live
                .as_mut()
                .and_then(|live| live.handle.take())
                .ok_or(PanelError::NoActiveJob)?
        };

        handle
            .await
            .map_err(|e| PanelError::PollTaskFailed(e.to_string()))
    }

    /// Start polling `job_id` and wait for its terminal view.
    pub async fn run(&self, job_id: JobId) -> Result<RenderOutcome, PanelError> {
        self.start(job_id).await?;
        self.wait().await
    }

    /// Ask the backend to cancel the tracked job.
    ///
    /// The poll keeps running; it ends once the backend reports the job as
    /// cancelled (or finished anyway).
    pub async fn request_cancel(&self, api: &ToolhubApi) -> Result<Ack, PanelError> {
        if !self.tool.supports_cancel() {
            return Err(PanelError::NotCancellable);
        }
        let job_id = self.current_job().await.ok_or(PanelError::NoActiveJob)?;
        Ok(api.cancel_job(&job_id).await?)
    }

    /// Drop the live poll and forget the job without contacting the
    /// backend.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let Some(live) = state.live.take() {
            tracing::info!(tool = ?self.tool, job_id = ?state.job_id, "Stopping poll");
            stop_poll(live).await;
        }
        state.job_id = None;
    }

    /// Stop the live poll and refuse further jobs.
    pub async fn shutdown(&self) {
        tracing::info!(tool = ?self.tool, "Shutting down job panel");
        self.cancel.cancel();
        self.stop().await;
    }
}

impl Drop for JobPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn stop_poll(live: LivePoll) {
    live.cancel.cancel();
    if let Some(handle) = live.handle {
        if tokio::time::timeout(STOP_TIMEOUT, handle).await.is_err() {
            tracing::warn!("Poll task did not exit in time");
        }
    }
}

/// Body of a panel's poll task.
async fn run_poll(
    source: Arc<dyn StatusSource>,
    tool: ToolKind,
    job_id: JobId,
    config: PollConfig,
    cancel: CancellationToken,
    event_tx: broadcast::Sender<JobEvent>,
) -> RenderOutcome {
    let outcome = poll_job(source.as_ref(), &job_id, &config, &cancel, |status| {
        let _ = event_tx.send(JobEvent::Progress {
            job_id: job_id.clone(),
            view: status.progress_view(tool),
            can_cancel: tool.supports_cancel() && status.cancellable(),
        });
    })
    .await;

    let rendered = render(tool, &job_id, &outcome);
    let _ = event_tx.send(JobEvent::Finished {
        job_id,
        outcome: rendered.clone(),
    });
    rendered
}
