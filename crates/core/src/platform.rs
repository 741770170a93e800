//! Media and social platforms.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Download platforms
// ---------------------------------------------------------------------------

/// Platforms the media downloader has a start endpoint for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPlatform {
    Youtube,
    Instagram,
    Facebook,
    Tiktok,
}

/// Quality sent when a YouTube download does not pick one.
pub const DEFAULT_YOUTUBE_QUALITY: &str = "best";

impl MediaPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
        }
    }

    /// Start endpoint, e.g. `/download-youtube`.
    pub fn endpoint(&self) -> String {
        format!("/download-{}", self.as_str())
    }

    /// Only YouTube downloads carry a `quality` field.
    pub fn accepts_quality(&self) -> bool {
        matches!(self, Self::Youtube)
    }

    /// Default error when the backend rejects a start without a message.
    pub fn start_failure_message(&self) -> String {
        format!("Failed to start {} download", self.as_str())
    }
}

impl std::str::FromStr for MediaPlatform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::Youtube),
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            "tiktok" => Ok(Self::Tiktok),
            other => Err(CoreError::Validation(format!(
                "Unsupported download platform: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Social platforms (comment authors)
// ---------------------------------------------------------------------------

/// Platform detected from a video URL, used to link comment authors to
/// their profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
    Twitter,
    Unknown,
}

impl SocialPlatform {
    /// Substring match on the URL, first hit wins.
    pub fn detect(url: &str) -> Self {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            Self::Youtube
        } else if url.contains("instagram.com") {
            Self::Instagram
        } else if url.contains("tiktok.com") {
            Self::Tiktok
        } else if url.contains("facebook.com") {
            Self::Facebook
        } else if url.contains("twitter.com") || url.contains("x.com") {
            Self::Twitter
        } else {
            Self::Unknown
        }
    }

    /// Prefix that a username is appended to. Empty for unknown platforms.
    pub fn profile_base_url(&self) -> &'static str {
        match self {
            Self::Youtube => "https://www.youtube.com/",
            Self::Instagram => "https://www.instagram.com/",
            Self::Tiktok => "https://www.tiktok.com/@",
            Self::Facebook => "https://www.facebook.com/",
            Self::Twitter => "https://twitter.com/",
            Self::Unknown => "",
        }
    }

    /// Profile link for a comment author. `None` for unknown platforms and
    /// for the `Unknown` placeholder author.
    pub fn profile_url(&self, author: &str) -> Option<String> {
        let base = self.profile_base_url();
        if base.is_empty() || author.is_empty() || author == "Unknown" {
            return None;
        }
        let username = author.strip_prefix('@').unwrap_or(author);
        Some(format!("{base}{username}"))
    }
}
