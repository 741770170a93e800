//! Download history.

use toolhub_core::history::RedownloadPage;
use toolhub_core::types::HistoryId;

use crate::api::{ApiError, ToolhubApi};
use crate::schemas::{HistoryListing, RedownloadResponse};

impl RedownloadResponse {
    /// Page whose poll follows the restarted download.
    pub fn page(&self) -> RedownloadPage {
        RedownloadPage::for_format(self.format_type.as_deref())
    }
}

impl ToolhubApi {
    /// Every recorded download with aggregate statistics.
    pub async fn history(&self) -> Result<HistoryListing, ApiError> {
        self.get_json("/api/history").await
    }

    /// Downloads matching `query`. A blank query lists everything.
    pub async fn search_history(&self, query: &str) -> Result<HistoryListing, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return self.history().await;
        }
        self.get_query("/api/history/search", &[("q", query)]).await
    }

    /// Restart a recorded download with its original settings.
    pub async fn redownload(&self, id: HistoryId) -> Result<RedownloadResponse, ApiError> {
        let reply: RedownloadResponse = self
            .post_bare(&format!("/api/history/redownload/{id}"))
            .await?;
        tracing::info!(history_id = id, job_id = ?reply.job_id, "Re-download started");
        Ok(reply)
    }

    pub async fn delete_history_entry(&self, id: HistoryId) -> Result<(), ApiError> {
        self.delete(&format!("/api/history/{id}")).await?;
        tracing::info!(history_id = id, "History entry deleted");
        Ok(())
    }

    pub async fn clear_history(&self) -> Result<(), ApiError> {
        self.post_empty("/api/history/clear").await?;
        tracing::info!("History cleared");
        Ok(())
    }
}
