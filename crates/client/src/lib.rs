//! Typed asynchronous client for the toolhub web utility backend.
//!
//! Every long-running tool follows the same protocol: a start endpoint
//! returns a `job_id`, the client polls `GET /status/{job_id}` on a fixed
//! interval until the job reaches a terminal status, and the final status
//! payload is rendered into a download link or a typed result.
//!
//! - [`api`] wraps the HTTP endpoints using [`reqwest`].
//! - [`poller`] drives the status loop with attempt limits, deadlines and
//!   cancellation.
//! - [`panel`] owns the single live poll of one view.
//! - [`render`] turns a finished poll into what the view shows.
//! - [`tools`] holds the per-tool submit operations.

pub mod api;
pub mod config;
pub mod events;
pub mod panel;
pub mod poller;
pub mod render;
pub mod schemas;
pub mod telemetry;
pub mod tools;

pub use api::{ApiError, ToolhubApi};
pub use config::{ClientConfig, ConfigError};
pub use panel::{JobPanel, PanelError};
pub use poller::{PollConfig, PollOutcome, StatusSource};
pub use render::RenderOutcome;
