//! Integration tests for the poll loop and the job panel.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use toolhub_client::events::JobEvent;
use toolhub_client::panel::{JobPanel, PanelError};
use toolhub_client::poller::{poll_job, PollConfig, PollOutcome};
use toolhub_client::render::RenderOutcome;
use toolhub_client::schemas::JobResult;
use toolhub_core::job::ToolKind;
use toolhub_core::types::JobId;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{hits, mount_status_sequence, processing, quick_poll, FixedStatuses};

// ---------------------------------------------------------------------------
// Test: a terminal status stops the poll for good
// ---------------------------------------------------------------------------

#[tokio::test]
async fn terminal_status_stops_requests() {
    let (server, api) = common::backend().await;
    mount_status_sequence(
        &server,
        "scan-1",
        &[
            processing(10, "Scanning..."),
            processing(60, "Hashing..."),
            json!({"status": "completed", "duplicate_groups": [], "unique_files": []}),
        ],
    )
    .await;

    let mut progress = Vec::new();
    let outcome = poll_job(
        &api,
        &JobId::new("scan-1"),
        &quick_poll(),
        &CancellationToken::new(),
        |s| progress.push(s.progress_view(ToolKind::DuplicateFinder).text),
    )
    .await;

    assert_matches!(outcome, PollOutcome::Completed(_));
    assert!(progress.iter().all(|t| t == "10%" || t == "60%"));

    let after_stop = hits(&server, "/status/scan-1").await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(hits(&server, "/status/scan-1").await, after_stop);
}

// ---------------------------------------------------------------------------
// Test: transient errors do not end the poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transient_errors_are_survived() {
    let (server, api) = common::backend().await;
    Mock::given(method("GET"))
        .and(path("/status/flaky"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "failed", "message": "Disk full"})),
        )
        .mount(&server)
        .await;

    let outcome = poll_job(
        &api,
        &JobId::new("flaky"),
        &quick_poll(),
        &CancellationToken::new(),
        |_| {},
    )
    .await;

    let PollOutcome::Failed(status) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(status.failure_message(ToolKind::AudioEnhancer), "Disk full");
}

// ---------------------------------------------------------------------------
// Test: deadline produces TimedOut
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn deadline_times_out() {
    let source = FixedStatuses::default().with("slow", processing(5, "Working"));
    let config = PollConfig {
        interval: Duration::from_secs(1),
        deadline: Some(Duration::from_secs(10)),
        ..Default::default()
    };

    let outcome = poll_job(&source, &JobId::new("slow"), &config, &CancellationToken::new(), |_| {})
        .await;

    assert_matches!(outcome, PollOutcome::TimedOut { elapsed, .. } if elapsed >= Duration::from_secs(10));
    // One request per second, the first one immediately.
    assert!((10..=11).contains(&source.calls()));
}

// ---------------------------------------------------------------------------
// Test: a panel runs a job to its rendered result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panel_renders_conversion_result() {
    let (server, api) = common::backend().await;
    mount_status_sequence(
        &server,
        "conv-9",
        &[
            processing(50, "Converting..."),
            json!({"status": "completed", "filename": "songs.zip", "is_zip": true}),
        ],
    )
    .await;

    let panel = JobPanel::new(Arc::new(api), ToolKind::MediaConverter, quick_poll());
    let mut events = panel.subscribe();

    let outcome = panel.run(JobId::new("conv-9")).await.unwrap();
    let RenderOutcome::Results { result, download_url, .. } = outcome else {
        panic!("expected results");
    };
    assert_matches!(result, JobResult::MediaConversion(ref r) if r.is_zip);
    assert_eq!(download_url.as_deref(), Some("/download/conv-9"));

    assert_matches!(events.recv().await.unwrap(), JobEvent::Started { .. });
    let mut last = None;
    while let Ok(event) = events.try_recv() {
        last = Some(event);
    }
    assert_matches!(last, Some(JobEvent::Finished { .. }));
    assert!(!panel.is_polling().await);
}

// ---------------------------------------------------------------------------
// Test: clean_folder completion becomes a direct download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clean_folder_job_becomes_download() {
    let (server, api) = common::backend().await;
    mount_status_sequence(
        &server,
        "clean-1",
        &[json!({"status": "completed", "type": "clean_folder", "message": "Folder ready"})],
    )
    .await;

    let panel = JobPanel::new(Arc::new(api), ToolKind::DuplicateFinder, quick_poll());
    let outcome = panel.run(JobId::new("clean-1")).await.unwrap();
    assert_eq!(
        outcome,
        RenderOutcome::Download {
            url: "/download/clean-1".into(),
            message: "Folder ready".into()
        }
    );
}

// ---------------------------------------------------------------------------
// Test: starting a second job aborts the first poll
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn second_start_replaces_live_poll() {
    let source = FixedStatuses::default()
        .with("first", processing(20, "Working"))
        .with("second", json!({"status": "cancelled"}))
        .shared();
    let panel = JobPanel::new(source, ToolKind::Subtitles, PollConfig::default());
    let mut events = panel.subscribe();

    panel.start(JobId::new("first")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    panel.start(JobId::new("second")).await.unwrap();

    let outcome = panel.wait().await.unwrap();
    assert_eq!(
        outcome,
        RenderOutcome::Cancelled { message: "Download cancelled".into() }
    );
    assert_eq!(panel.current_job().await, Some(JobId::new("second")));

    let mut finished = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let JobEvent::Finished { job_id, outcome } = event {
            finished.push((job_id.as_str().to_string(), outcome));
        }
    }
    assert_eq!(finished.len(), 2);
    assert_eq!(finished[0], ("first".to_string(), RenderOutcome::Aborted));
    assert_eq!(finished[1].0, "second");
}

// ---------------------------------------------------------------------------
// Test: stop resets the panel locally
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stop_forgets_job() {
    let source = FixedStatuses::default().with("j", processing(1, "")).shared();
    let panel = JobPanel::new(source, ToolKind::GifMaker, PollConfig::default());

    panel.start(JobId::new("j")).await.unwrap();
    assert!(panel.is_polling().await);

    panel.stop().await;
    assert!(!panel.is_polling().await);
    assert_eq!(panel.current_job().await, None);
    assert_matches!(panel.wait().await, Err(PanelError::NoActiveJob));
}

// ---------------------------------------------------------------------------
// Test: shut down panels refuse new jobs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_refuses_jobs() {
    let panel = JobPanel::new(
        FixedStatuses::default().shared(),
        ToolKind::AudioEnhancer,
        PollConfig::default(),
    );
    panel.shutdown().await;
    assert_matches!(panel.start(JobId::new("x")).await, Err(PanelError::ShutDown));
}

// ---------------------------------------------------------------------------
// Test: cancellation is advisory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_request_keeps_polling_until_backend_confirms() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/cancel/dl-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Cancellation requested"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_status_sequence(
        &server,
        "dl-1",
        &[
            json!({"status": "processing", "progress": 30, "can_cancel": true}),
            json!({"status": "processing", "progress": 35, "can_cancel": true}),
            json!({"status": "cancelled", "message": "Download cancelled by user"}),
        ],
    )
    .await;

    let api = Arc::new(api);
    let panel = JobPanel::new(api.clone(), ToolKind::MediaDownloader, quick_poll());
    panel.start(JobId::new("dl-1")).await.unwrap();

    let ack = panel.request_cancel(&api).await.unwrap();
    assert_eq!(ack.success, Some(true));

    let outcome = panel.wait().await.unwrap();
    assert_eq!(
        outcome,
        RenderOutcome::Cancelled { message: "Download cancelled by user".into() }
    );

    let gif_panel = JobPanel::new(api.clone(), ToolKind::GifMaker, quick_poll());
    assert_matches!(gif_panel.request_cancel(&api).await, Err(PanelError::NotCancellable));
}
