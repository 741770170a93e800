//! Duplicate finder: folder scans and spreadsheet scans.

use std::path::PathBuf;

use reqwest::multipart::Form;
use serde::Serialize;
use toolhub_core::duplicates::{validate_columns, DuplicateFile, ExcelColumns, ExportType};
use toolhub_core::types::JobId;
use toolhub_core::validation::{
    require, validate_spreadsheet_name, MSG_NO_FILES_TO_DELETE, MSG_NO_FOLDER, MSG_NO_SPREADSHEET,
};

use crate::api::{file_part, flag, ApiError, ToolhubApi};
use crate::schemas::Ack;

/// Comparison used by a folder scan.
pub const DEFAULT_SCAN_METHOD: &str = "hash";

/// Files of one folder to scan for duplicates.
#[derive(Debug, Clone)]
pub struct FolderScan {
    pub files: Vec<PathBuf>,
    pub scan_method: String,
    /// Files smaller than this many bytes are ignored.
    pub min_file_size: u64,
    /// Comma-separated extensions; empty scans every type.
    pub file_types: String,
    pub include_subfolders: bool,
}

impl FolderScan {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            scan_method: DEFAULT_SCAN_METHOD.to_string(),
            min_file_size: 0,
            file_types: String::new(),
            include_subfolders: true,
        }
    }
}

/// A spreadsheet to de-duplicate on a set of columns.
#[derive(Debug, Clone)]
pub struct SpreadsheetScan {
    pub file: PathBuf,
    pub columns: Vec<String>,
    /// Keep the first row of each group in the cleaned copy.
    pub keep_first: bool,
}

#[derive(Serialize)]
struct DeleteFilesRequest<'a> {
    files: &'a [DuplicateFile],
}

#[derive(Serialize)]
struct FollowUpRequest<'a> {
    job_id: &'a JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_type: Option<ExportType>,
}

impl ToolhubApi {
    /// Start a duplicate scan over the files of a folder.
    pub async fn scan_folder(&self, scan: &FolderScan) -> Result<JobId, ApiError> {
        require(!scan.files.is_empty(), MSG_NO_FOLDER)?;

        let mut form = Form::new();
        for path in &scan.files {
            form = form.part("files[]", file_part(path).await?);
        }
        let form = form
            .text("scan_method", scan.scan_method.clone())
            .text("min_file_size", scan.min_file_size.to_string())
            .text("file_types", scan.file_types.clone())
            .text("include_subfolders", flag(scan.include_subfolders));

        tracing::debug!(files = scan.files.len(), method = %scan.scan_method, "Submitting folder scan");
        self.start_multipart_job("/find-duplicates", form, "Failed to start scan")
            .await
    }

    /// Delete the given duplicate files on the backend host.
    pub async fn delete_files(&self, files: &[DuplicateFile]) -> Result<Ack, ApiError> {
        require(!files.is_empty(), MSG_NO_FILES_TO_DELETE)?;
        let ack = self
            .post_json("/delete-duplicates", &DeleteFilesRequest { files })
            .await?;
        tracing::info!(count = files.len(), "Duplicate files deleted");
        Ok(ack)
    }

    /// Build a de-duplicated copy of a scanned folder. Completes as a
    /// `clean_folder` download job.
    pub async fn create_clean_folder(&self, scan_job: &JobId) -> Result<JobId, ApiError> {
        let body = FollowUpRequest {
            job_id: scan_job,
            export_type: None,
        };
        self.start_json_job("/create-clean-folder", &body, "Failed to create clean folder")
            .await
    }

    /// List the columns of a spreadsheet.
    pub async fn excel_columns(&self, file: &std::path::Path) -> Result<ExcelColumns, ApiError> {
        validate_spreadsheet(file)?;
        let form = Form::new().part("file", file_part(file).await?);
        self.post_multipart("/get-excel-columns", form).await
    }

    /// Start a duplicate scan over a spreadsheet's rows.
    pub async fn scan_spreadsheet(&self, scan: &SpreadsheetScan) -> Result<JobId, ApiError> {
        validate_spreadsheet(&scan.file)?;
        validate_columns(&scan.columns)?;

        let columns = serde_json::to_string(&scan.columns)
            .map_err(|e| toolhub_core::error::CoreError::Internal(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part(&scan.file).await?)
            .text("columns", columns)
            .text("keep_first", flag(scan.keep_first));

        self.start_multipart_job("/find-excel-duplicates", form, "Failed to start scan")
            .await
    }

    /// Export rows of a finished spreadsheet scan. Completes as an
    /// `excel_export` download job.
    pub async fn export_spreadsheet(
        &self,
        scan_job: &JobId,
        export_type: ExportType,
    ) -> Result<JobId, ApiError> {
        let body = FollowUpRequest {
            job_id: scan_job,
            export_type: Some(export_type),
        };
        self.start_json_job("/export-excel-duplicates", &body, "Failed to export")
            .await
    }
}

fn validate_spreadsheet(file: &std::path::Path) -> Result<(), ApiError> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    require(!name.is_empty(), MSG_NO_SPREADSHEET)?;
    validate_spreadsheet_name(&name)?;
    Ok(())
}
