//! Duplicate finder domain: scan results, summaries and file selection.
//!
//! Groups arrive in the completed status payload of a scan job. The summary
//! and selection logic here are what the results view is built from.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::format::format_megabytes;
use crate::validation::{MSG_NO_COLUMNS, MSG_NO_FILES_TO_DELETE};

// ---------------------------------------------------------------------------
// Folder scan
// ---------------------------------------------------------------------------

/// One file inside a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateFile {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// Files sharing identical content. `size` is the size of each copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub size: u64,
    pub files: Vec<DuplicateFile>,
}

impl DuplicateGroup {
    /// Copies beyond the first one.
    pub fn redundant_copies(&self) -> u64 {
        self.files.len().saturating_sub(1) as u64
    }

    /// Bytes reclaimable by keeping a single copy.
    pub fn wasted_bytes(&self) -> u64 {
        self.size.saturating_mul(self.redundant_copies())
    }

    /// Group heading, e.g. `3 duplicate files (1.00 MB each)`.
    pub fn title(&self) -> String {
        format!(
            "{} duplicate files ({} each)",
            self.files.len(),
            format_megabytes(self.size)
        )
    }
}

/// Header figures of a folder scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub group_count: usize,
    pub duplicate_file_count: u64,
    pub wasted_bytes: u64,
}

impl ScanSummary {
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        Self {
            group_count: groups.len(),
            duplicate_file_count: groups
                .iter()
                .map(DuplicateGroup::redundant_copies)
                .fold(0, u64::saturating_add),
            wasted_bytes: groups
                .iter()
                .map(DuplicateGroup::wasted_bytes)
                .fold(0, u64::saturating_add),
        }
    }

    /// Wasted space as shown in the header (`2.00 MB`).
    pub fn wasted_label(&self) -> String {
        format_megabytes(self.wasted_bytes)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Address of a file inside the scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileKey {
    pub group: usize,
    pub file: usize,
}

impl FileKey {
    pub fn new(group: usize, file: usize) -> Self {
        Self { group, file }
    }
}

impl std::fmt::Display for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.group, self.file)
    }
}

/// Files the user marked for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSelection {
    keys: BTreeSet<FileKey>,
}

impl DuplicateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one file. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: FileKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn is_selected(&self, key: FileKey) -> bool {
        self.keys.contains(&key)
    }

    /// Select every file of one group. Out-of-range groups are ignored.
    pub fn select_group(&mut self, groups: &[DuplicateGroup], group: usize) {
        if let Some(g) = groups.get(group) {
            self.keys
                .extend((0..g.files.len()).map(|file| FileKey::new(group, file)));
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The selected files in key order. Keys no longer pointing at a file
    /// are skipped.
    pub fn resolve<'a>(&self, groups: &'a [DuplicateGroup]) -> Vec<&'a DuplicateFile> {
        self.keys
            .iter()
            .filter_map(|k| groups.get(k.group).and_then(|g| g.files.get(k.file)))
            .collect()
    }

    /// Files to send to `/delete-duplicates`. Fails when nothing is selected.
    pub fn files_to_delete(&self, groups: &[DuplicateGroup]) -> Result<Vec<DuplicateFile>, CoreError> {
        let files: Vec<DuplicateFile> = self.resolve(groups).into_iter().cloned().collect();
        if files.is_empty() {
            return Err(CoreError::Validation(MSG_NO_FILES_TO_DELETE.to_string()));
        }
        Ok(files)
    }

    /// Drop the selected files from `groups` after a successful delete, then
    /// drop every group left with a single file. Clears the selection.
    pub fn prune(&mut self, groups: &mut Vec<DuplicateGroup>) {
        for (group_index, group) in groups.iter_mut().enumerate() {
            let mut file_index = 0;
            group.files.retain(|_| {
                let keep = !self.keys.contains(&FileKey::new(group_index, file_index));
                file_index += 1;
                keep
            });
        }
        groups.retain(|g| g.files.len() > 1);
        self.keys.clear();
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet scan
// ---------------------------------------------------------------------------

/// Response of `/get-excel-columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcelColumns {
    pub columns: Vec<String>,
    #[serde(default)]
    pub row_count: u64,
}

/// Rows sharing the same values in the checked columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcelDuplicateGroup {
    pub count: u64,
    /// Column name to shared value.
    #[serde(default)]
    pub key: Map<String, Value>,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    /// Zero-based row indices, parallel to `rows`.
    #[serde(default)]
    pub indices: Vec<u64>,
}

impl ExcelDuplicateGroup {
    /// `col=value, col=value` in key order.
    pub fn matching_values(&self) -> String {
        self.key
            .iter()
            .map(|(k, v)| format!("{k}={}", display_cell(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One-based spreadsheet row number for the `i`-th row of the group.
    pub fn row_number(&self, i: usize) -> Option<u64> {
        self.indices.get(i).map(|idx| idx + 1)
    }
}

/// Cell text as shown in the results view; null renders as `(empty)`.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "(empty)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Which rows an export job writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    Unique,
    Duplicates,
    Cleaned,
}

/// Columns picked for a spreadsheet scan. Fails when none are picked.
pub fn validate_columns(columns: &[String]) -> Result<(), CoreError> {
    if columns.is_empty() {
        return Err(CoreError::Validation(MSG_NO_COLUMNS.to_string()));
    }
    Ok(())
}
