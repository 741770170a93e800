//! Integration tests for job submission: start-endpoint semantics and
//! client-side validation.

mod common;

use std::path::PathBuf;

use assert_matches::assert_matches;
use serde_json::json;
use toolhub_client::api::ApiError;
use toolhub_client::tools::media::MediaDownload;
use toolhub_core::platform::MediaPlatform;
use toolhub_core::selection::{ConversionType, FileSelection, SelectedFile};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn media_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

// ---------------------------------------------------------------------------
// Test: 2xx with job_id returns the id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_returns_job_id() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/download-youtube"))
        .and(body_json(json!({
            "url": "https://www.youtube.com/watch?v=abc",
            "format": "video",
            "quality": "best"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "yt-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = MediaDownload::new(MediaPlatform::Youtube, "https://www.youtube.com/watch?v=abc");
    let job = api.download_media(&request).await.unwrap();
    assert_eq!(job.as_str(), "yt-1");
}

// ---------------------------------------------------------------------------
// Test: quality is only sent for YouTube
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quality_omitted_for_other_platforms() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/download-tiktok"))
        .and(body_json(json!({"url": "https://www.tiktok.com/@a/video/1", "format": "audio"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "tt-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = MediaDownload::new(MediaPlatform::Tiktok, "https://www.tiktok.com/@a/video/1");
    request.format = "audio".into();
    request.quality = Some("720p".into());
    api.download_media(&request).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: 2xx without job_id is a failure carrying the body's error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_without_job_id_fails() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/download-instagram"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Private post"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download-facebook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Instagram, "https://instagram.com/p/1"))
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::MissingJobId(ref m) if m == "Private post");

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Facebook, "https://facebook.com/v/1"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Failed to start facebook download");
}

// ---------------------------------------------------------------------------
// Test: non-2xx surfaces the error field, else status and raw body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejection_messages() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/download-youtube"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Unsupported URL"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/download-tiktok"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Youtube, "https://youtu.be/x"))
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Rejected { status: 400, .. });
    assert_eq!(err.user_message(), "Unsupported URL");

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Tiktok, "https://tiktok.com/x"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Server error (500): boom");
}

// ---------------------------------------------------------------------------
// Test: network failure surfaces the transport error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn network_failure() {
    let (server, api) = common::backend().await;
    drop(server);

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Youtube, "https://youtu.be/x"))
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Request(_));
    assert!(err.user_message().starts_with("Network error: "));
}

// ---------------------------------------------------------------------------
// Test: invalid input never reaches the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_failures_issue_no_requests() {
    let (server, api) = common::backend().await;

    let err = api.encrypt(None, "secret").await.unwrap_err();
    assert_eq!(err.user_message(), "Please select a file and enter a password");

    let dir = tempfile::tempdir().unwrap();
    let file = media_file(&dir, "notes.txt", b"hello");
    let err = api.encrypt(Some(&file), "abc").await.unwrap_err();
    assert_eq!(err.user_message(), "Password must be at least 4 characters long");

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Youtube, "   "))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Please enter a URL");

    let err = api
        .download_media(&MediaDownload::new(MediaPlatform::Youtube, "not a url"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Please enter a valid URL");

    let err = api
        .convert(&FileSelection::default(), ConversionType::Mp4ToMp3, "192k")
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Invalid(_));

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: conversion uploads every selected file as files[]
// ---------------------------------------------------------------------------

#[tokio::test]
async fn convert_uploads_selection() {
    let (server, api) = common::backend().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "conv-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let a = media_file(&dir, "a.mp4", b"aaaa");
    let b = media_file(&dir, "b.mp4", b"bbbbbb");
    let mut selection = FileSelection::default();
    let report = selection.add([
        SelectedFile::new("a.mp4", 4, &a),
        SelectedFile::new("b.mp4", 6, &b),
        SelectedFile::new("a.mp4", 4, &a),
    ]);
    assert_eq!(report.added, 2);
    assert_eq!(report.duplicates, 1);

    let job = api
        .convert(&selection, ConversionType::Mp4ToMp3, "192k")
        .await
        .unwrap();
    assert_eq!(job.as_str(), "conv-1");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert_eq!(body.matches("name=\"files[]\"").count(), 2);
    assert!(body.contains("filename=\"a.mp4\""));
    assert!(body.contains("name=\"bitrate\"\r\n\r\n192k"));
    assert!(body.contains("name=\"conversion_type\"\r\n\r\nmp4_to_mp3"));
}
