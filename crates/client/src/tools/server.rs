//! Local network banner.

use crate::api::{ApiError, ToolhubApi};
use crate::schemas::ServerInfo;

impl ToolhubApi {
    /// Address other devices on the LAN can reach the backend at.
    pub async fn server_info(&self) -> Result<ServerInfo, ApiError> {
        self.get_flagged("/api/server-info", "Server info unavailable")
            .await
    }
}
