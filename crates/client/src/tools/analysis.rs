//! Synchronous analysis and search tools.
//!
//! These endpoints answer in one request with a `{success, error, ...}`
//! body. Their report layouts are open-ended, so only the fields the
//! client acts on are typed and the rest is kept as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolhub_core::hook::HookScoreCategory;
use toolhub_core::picker::PickerOption;
use toolhub_core::platform::SocialPlatform;
use toolhub_core::validation::{
    require_text, validate_url, MSG_NO_HOOK, MSG_NO_NEWS_NAME, MSG_NO_SEARCH_NAME,
    MSG_NO_TREND_KEYWORD, MSG_NO_VIDEO_URL,
};

use crate::api::{ApiError, ToolhubApi};

pub const MSG_NO_COMMENTS: &str = "No comments found in this video";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendReport {
    #[serde(default)]
    pub trends: Vec<Value>,
    #[serde(default)]
    pub stats: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profiles found per platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileSearch {
    #[serde(default)]
    pub results: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub stats: Map<String, Value>,
}

impl ProfileSearch {
    /// Profiles flagged `verified`, across all platforms.
    pub fn verified(&self) -> Vec<(&str, &Value)> {
        self.results
            .iter()
            .flat_map(|(platform, profiles)| profiles.iter().map(move |p| (platform.as_str(), p)))
            .filter(|(_, p)| p.get("verified").and_then(Value::as_bool).unwrap_or(false))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewsSearch {
    #[serde(default)]
    pub news: Vec<Value>,
    #[serde(default)]
    pub stats: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookAnalysis {
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub overall_label: Option<String>,
    #[serde(default)]
    pub overall_description: Option<String>,
    #[serde(default)]
    pub details: Value,
    /// Suggestions, examples, alternatives and the like.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookAnalysis {
    /// Band of the overall score, if the backend sent one.
    pub fn category(&self) -> Option<HookScoreCategory> {
        self.overall_score.map(HookScoreCategory::from_score)
    }
}

/// Comments pulled from a video, ready to load into the random picker.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentHarvest {
    pub platform: SocialPlatform,
    pub options: Vec<PickerOption>,
}

/// Comments arrive either as `{text, author}` objects or bare strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CommentEntry {
    Detailed {
        text: String,
        #[serde(default)]
        author: Option<String>,
    },
    Plain(String),
    Other(Value),
}

impl From<CommentEntry> for PickerOption {
    fn from(entry: CommentEntry) -> Self {
        match entry {
            CommentEntry::Detailed { text, author } => PickerOption::comment(text, author),
            CommentEntry::Plain(text) => PickerOption::comment(text, None),
            CommentEntry::Other(value) => PickerOption::comment(value.to_string(), None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentsReply {
    #[serde(default)]
    comments: Vec<CommentEntry>,
}

#[derive(Serialize)]
struct KeywordRequest<'a> {
    keyword: &'a str,
    platform: &'a str,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct UrlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct HookRequest<'a> {
    hook: &'a str,
    platform: &'a str,
}

impl ToolhubApi {
    pub async fn detect_trends(&self, keyword: &str, platform: &str) -> Result<TrendReport, ApiError> {
        let keyword = require_text(keyword, MSG_NO_TREND_KEYWORD)?;
        self.post_flagged(
            "/detect-trends",
            &KeywordRequest { keyword, platform },
            "Failed to detect trends",
        )
        .await
    }

    pub async fn search_profiles(&self, name: &str) -> Result<ProfileSearch, ApiError> {
        let name = require_text(name, MSG_NO_SEARCH_NAME)?;
        self.post_flagged(
            "/search-social-media",
            &NameRequest { name },
            "Failed to search social media",
        )
        .await
    }

    pub async fn search_news(&self, name: &str) -> Result<NewsSearch, ApiError> {
        let name = require_text(name, MSG_NO_NEWS_NAME)?;
        self.post_flagged(
            "/search-social-media-news",
            &NameRequest { name },
            "Failed to search news",
        )
        .await
    }

    /// Pull the comments of a video as picker options.
    pub async fn extract_comments(&self, url: &str) -> Result<CommentHarvest, ApiError> {
        let url = validate_url(url, MSG_NO_VIDEO_URL)?;
        let reply: CommentsReply = self
            .post_flagged(
                "/extract-video-comments",
                &UrlRequest { url },
                "Failed to load comments",
            )
            .await?;

        if reply.comments.is_empty() {
            return Err(ApiError::Unsuccessful(MSG_NO_COMMENTS.to_string()));
        }

        let platform = SocialPlatform::detect(url);
        tracing::info!(platform = ?platform, count = reply.comments.len(), "Comments extracted");
        Ok(CommentHarvest {
            platform,
            options: reply.comments.into_iter().map(PickerOption::from).collect(),
        })
    }

    pub async fn analyze_hook(&self, hook: &str, platform: &str) -> Result<HookAnalysis, ApiError> {
        let hook = require_text(hook, MSG_NO_HOOK)?;
        self.post_flagged(
            "/analyze-hook",
            &HookRequest { hook, platform },
            "Unknown error",
        )
        .await
    }
}
