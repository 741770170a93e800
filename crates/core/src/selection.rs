//! Multi-file upload selection for the media converter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validation::{oversize_file_message, MAX_MEDIA_UPLOAD_BYTES};

/// Direction of a media conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionType {
    #[default]
    Mp4ToMp3,
    Mp3ToMp4,
}

impl ConversionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4ToMp3 => "mp4_to_mp3",
            Self::Mp3ToMp4 => "mp3_to_mp4",
        }
    }

    /// Output container shown on the convert button.
    pub fn output_format(&self) -> &'static str {
        match self {
            Self::Mp4ToMp3 => "MP3",
            Self::Mp3ToMp4 => "MP4",
        }
    }

    /// Hint under the drop zone.
    pub fn supported_formats(&self) -> &'static str {
        match self {
            Self::Mp4ToMp3 => "Supports: MP4, MKV, AVI, MOV, WebM (Max 500MB per file)",
            Self::Mp3ToMp4 => "Supports: MP3, WAV, OGG, M4A (Max 500MB per file)",
        }
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    fn same_identity(&self, other: &SelectedFile) -> bool {
        self.name == other.name && self.size == other.size
    }
}

/// What happened to a batch passed to [`FileSelection::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: usize,
    /// Already present by name and size.
    pub duplicates: usize,
    /// One message per file over the size limit.
    pub rejected: Vec<String>,
}

/// Ordered list of files, unique by `(name, size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
    max_file_bytes: u64,
}

impl Default for FileSelection {
    fn default() -> Self {
        Self::new(MAX_MEDIA_UPLOAD_BYTES)
    }
}

impl FileSelection {
    pub fn new(max_file_bytes: u64) -> Self {
        Self {
            files: Vec::new(),
            max_file_bytes,
        }
    }

    /// Append files in order, skipping oversize ones and ones already
    /// selected.
    pub fn add(&mut self, batch: impl IntoIterator<Item = SelectedFile>) -> AddReport {
        let mut report = AddReport::default();
        for file in batch {
            if file.size > self.max_file_bytes {
                report.rejected.push(oversize_file_message(&file.name));
                continue;
            }
            if self.files.iter().any(|f| f.same_identity(&file)) {
                report.duplicates += 1;
                continue;
            }
            self.files.push(file);
            report.added += 1;
        }
        report
    }

    /// Remove the file at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Convert button text for the current selection.
    pub fn convert_label(&self, conversion: ConversionType) -> String {
        if self.files.is_empty() {
            return "Select Files to Convert".to_string();
        }
        format!(
            "Convert {} File(s) to {}",
            self.files.len(),
            conversion.output_format()
        )
    }
}
