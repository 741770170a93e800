//! Job status polling.
//!
//! [`poll_job`] drives one job from `processing` to a terminal outcome. It
//! ticks at a fixed interval without waiting for the previous request, so
//! a slow backend never stretches the cadence. Responses can therefore
//! arrive out of order; each request carries a sequence number and only a
//! response newer than the last one applied is acted upon.

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use toolhub_core::job::{JobStatus, ToolKind, DEFAULT_POLL_INTERVAL};
use toolhub_core::types::JobId;

use crate::api::{ApiError, ToolhubApi};
use crate::schemas::StatusResponse;

/// Default cap on concurrently outstanding status requests.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;
/// Default limit on how long one status request may take.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(30);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// How a job is polled.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Period between status requests.
    pub interval: Duration,
    /// Give up after issuing this many requests. `None` polls forever.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed. `None` polls forever.
    pub deadline: Option<Duration>,
    /// Ticks are skipped while this many requests are outstanding.
    pub max_in_flight: usize,
    /// A status request still unanswered after this long is dropped and
    /// counted as a failed request.
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            deadline: None,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }
}

impl PollConfig {
    /// Defaults with the tool's own cadence.
    pub fn for_tool(tool: ToolKind) -> Self {
        Self {
            interval: tool.poll_interval(),
            ..Default::default()
        }
    }
}

/// Anything that can report a job's status.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusResponse, ApiError>;
}

#[async_trait::async_trait]
impl StatusSource for ToolhubApi {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusResponse, ApiError> {
        self.job_status(job_id).await
    }
}

/// How a poll ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(StatusResponse),
    Failed(StatusResponse),
    Cancelled(StatusResponse),
    /// The attempt budget or deadline ran out while the job was still
    /// processing.
    TimedOut { attempts: u32, elapsed: Duration },
    /// The poll was stopped locally before the job finished.
    Aborted,
}

impl PollOutcome {
    fn from_terminal(status: StatusResponse) -> Option<Self> {
        match status.status {
            JobStatus::Completed => Some(Self::Completed(status)),
            JobStatus::Failed => Some(Self::Failed(status)),
            JobStatus::Cancelled => Some(Self::Cancelled(status)),
            JobStatus::Processing => None,
        }
    }
}

/// Poll `job_id` until it reaches a terminal status, `cancel` fires, or
/// the configured budget runs out.
///
/// `on_progress` is called with every `processing` observation that is
/// newer than the previous one. Transport and decode errors, and requests
/// that outlive `config.request_timeout`, are logged and the poll carries
/// on at the next tick.
pub async fn poll_job<S, F>(
    source: &S,
    job_id: &JobId,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> PollOutcome
where
    S: StatusSource + ?Sized,
    F: FnMut(&StatusResponse),
{
    let started = Instant::now();
    let max_in_flight = config.max_in_flight.max(1);
    let request_timeout = config.request_timeout;

    let mut ticker = tokio::time::interval(config.interval.max(MIN_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = async {
        match config.deadline {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut in_flight = FuturesUnordered::new();
    let mut issued: u32 = 0;
    let mut applied: u32 = 0;

    tracing::debug!(job_id = %job_id, interval_ms = config.interval.as_millis() as u64, "Polling started");

    loop {
        let exhausted = config.max_attempts.is_some_and(|max| issued >= max);
        if exhausted && in_flight.is_empty() {
            tracing::warn!(job_id = %job_id, attempts = issued, "Polling gave up: attempt budget spent");
            return PollOutcome::TimedOut {
                attempts: issued,
                elapsed: started.elapsed(),
            };
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Polling aborted");
                return PollOutcome::Aborted;
            }

            _ = &mut deadline => {
                tracing::warn!(job_id = %job_id, attempts = issued, "Polling gave up: deadline reached");
                return PollOutcome::TimedOut {
                    attempts: issued,
                    elapsed: started.elapsed(),
                };
            }

            Some((seq, result)) = in_flight.next(), if !in_flight.is_empty() => {
                let status: StatusResponse = match result {
                    Ok(Ok(status)) => status,
                    Err(_) => {
                        tracing::warn!(job_id = %job_id, seq, timeout_ms = request_timeout.as_millis() as u64, "Status request timed out");
                        continue;
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(job_id = %job_id, seq, error = %e, "Status request failed");
                        continue;
                    }
                };

                if seq <= applied {
                    tracing::trace!(job_id = %job_id, seq, applied, "Discarding stale status");
                    continue;
                }
                applied = seq;

                if let Some(outcome) = PollOutcome::from_terminal(status.clone()) {
                    tracing::info!(job_id = %job_id, status = status.status.as_str(), attempts = issued, "Job finished");
                    return outcome;
                }
                on_progress(&status);
            }

            _ = ticker.tick(), if !exhausted => {
                if in_flight.len() >= max_in_flight {
                    tracing::debug!(job_id = %job_id, in_flight = in_flight.len(), "Skipping tick: too many requests outstanding");
                    continue;
                }
                issued += 1;
                let seq = issued;
                in_flight.push(async move {
                    let result = tokio::time::timeout(request_timeout, source.fetch_status(job_id)).await;
                    (seq, result)
                });
            }
        }
    }
}
