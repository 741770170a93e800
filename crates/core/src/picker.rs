//! Random picker: an option list with search, file import and a bounded
//! pick history.

use std::collections::VecDeque;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Picks remembered by the history panel.
pub const MAX_PICK_HISTORY: usize = 20;
/// Count used by multiple-pick mode when none is given.
pub const DEFAULT_MULTI_PICK: usize = 2;

pub const MSG_OPTION_EXISTS: &str = "This option already exists!";
pub const MSG_NO_OPTIONS: &str = "No options available";
pub const MSG_NO_SEARCH_MATCHES: &str =
    "No options match your search. Clear the search to pick from all options.";
pub const MSG_NO_FILE_OPTIONS: &str = "No valid options found in the file. Make sure the file contains options (one per line for .txt, one per row for .csv, or an array for .json).";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// A pickable entry. Options loaded from video comments carry their author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOption {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl PickerOption {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
        }
    }

    pub fn comment(text: impl Into<String>, author: Option<String>) -> Self {
        Self {
            text: text.into(),
            author: Some(author.unwrap_or_else(|| "Unknown".to_string())),
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

impl ImportReport {
    /// e.g. `Loaded 3 options from file (1 duplicate skipped)`.
    pub fn message(&self, noun: &str, source: &str) -> String {
        let mut msg = format!(
            "Loaded {} {noun}{} from {source}",
            self.added,
            plural(self.added)
        );
        if self.skipped > 0 {
            msg.push_str(&format!(
                " ({} duplicate{} skipped)",
                self.skipped,
                plural(self.skipped)
            ));
        }
        msg
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

// ---------------------------------------------------------------------------
// File import
// ---------------------------------------------------------------------------

/// Extract options from an uploaded file by extension: `.txt` one per line,
/// `.csv` first column of each row, `.json` an array or the first array
/// property of an object.
pub fn parse_options_file(file_name: &str, content: &str) -> Result<Vec<String>, CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();

    let options: Vec<String> = match ext.as_str() {
        "txt" => content.lines().map(|l| l.trim().to_string()).collect(),
        "csv" => content
            .lines()
            .map(|l| l.split(',').next().unwrap_or_default().trim().to_string())
            .collect(),
        "json" => {
            let data: Value = serde_json::from_str(content)
                .map_err(|e| CoreError::Validation(format!("Error reading file: {e}")))?;
            let items = match &data {
                Value::Array(items) => Some(items),
                Value::Object(map) => map.values().find_map(Value::as_array),
                _ => None,
            };
            items
                .into_iter()
                .flatten()
                .map(|item| match item {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .collect()
        }
        _ => Vec::new(),
    };

    let options: Vec<String> = options.into_iter().filter(|o| !o.is_empty()).collect();
    if options.is_empty() {
        return Err(CoreError::Validation(MSG_NO_FILE_OPTIONS.to_string()));
    }
    Ok(options)
}

// ---------------------------------------------------------------------------
// Picking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "count")]
pub enum PickMode {
    Single,
    /// Distinct options, capped at the number available.
    Multiple(usize),
    /// One option, removed from the list afterwards.
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickResult {
    pub mode: PickMode,
    pub picked: Vec<PickerOption>,
}

impl PickResult {
    /// Heading above the result display.
    pub fn label(&self) -> String {
        match self.mode {
            PickMode::Single => "The winner is...".to_string(),
            PickMode::Multiple(_) => {
                let n = self.picked.len();
                format!("Picked {n} option{}:", if n > 1 { "s" } else { "" })
            }
            PickMode::Remove => "Picked and removed:".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickHistoryEntry {
    pub mode: PickMode,
    pub results: Vec<PickerOption>,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Picker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RandomPicker {
    options: Vec<PickerOption>,
    search: Option<String>,
    history: VecDeque<PickHistoryEntry>,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }

    pub fn history(&self) -> impl Iterator<Item = &PickHistoryEntry> {
        self.history.iter()
    }

    fn contains(&self, text: &str) -> bool {
        self.options.iter().any(|o| o.text == text)
    }

    /// Add a typed option. Blank input is ignored (`Ok(false)`); an existing
    /// option is a conflict. Adding clears the search.
    pub fn add(&mut self, text: &str) -> Result<bool, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        if self.contains(text) {
            return Err(CoreError::Conflict(MSG_OPTION_EXISTS.to_string()));
        }
        self.options.push(PickerOption::plain(text));
        self.search = None;
        Ok(true)
    }

    /// Add many options at once, skipping ones already present by text.
    pub fn import(&mut self, options: impl IntoIterator<Item = PickerOption>) -> ImportReport {
        let mut report = ImportReport::default();
        for option in options {
            if self.contains(&option.text) {
                report.skipped += 1;
            } else {
                self.options.push(option);
                report.added += 1;
            }
        }
        self.search = None;
        report
    }

    /// Parse an options file and import its entries.
    pub fn import_file(&mut self, file_name: &str, content: &str) -> Result<ImportReport, CoreError> {
        let options = parse_options_file(file_name, content)?;
        Ok(self.import(options.into_iter().map(PickerOption::plain)))
    }

    /// Remove every option with this text. Returns whether one was removed.
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.text != text);
        before != self.options.len()
    }

    /// Set the case-insensitive search filter. Blank terms clear it.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Options passing the current search filter.
    pub fn visible(&self) -> Vec<&PickerOption> {
        match &self.search {
            None => self.options.iter().collect(),
            Some(term) => self
                .options
                .iter()
                .filter(|o| o.text.to_lowercase().contains(term.as_str()))
                .collect(),
        }
    }

    /// Search result line, `None` when not searching.
    pub fn search_summary(&self) -> Option<String> {
        self.search.as_ref()?;
        let found = self.visible().len();
        if found == 0 {
            return Some("No matches found".to_string());
        }
        let total = self.options.len();
        Some(format!("Found {found} of {total} option{}", plural(total)))
    }

    /// Pick from the visible options and record the pick in history.
    pub fn pick<R: Rng>(&mut self, mode: PickMode, rng: &mut R) -> Result<PickResult, CoreError> {
        let available: Vec<PickerOption> = self.visible().into_iter().cloned().collect();
        if available.is_empty() {
            let msg = if self.is_searching() {
                MSG_NO_SEARCH_MATCHES
            } else {
                MSG_NO_OPTIONS
            };
            return Err(CoreError::Validation(msg.to_string()));
        }

        let picked = match mode {
            PickMode::Single | PickMode::Remove => {
                vec![available[rng.random_range(0..available.len())].clone()]
            }
            PickMode::Multiple(count) => {
                let count = if count == 0 { DEFAULT_MULTI_PICK } else { count };
                let amount = count.min(available.len());
                rand::seq::index::sample(rng, available.len(), amount)
                    .into_iter()
                    .map(|i| available[i].clone())
                    .collect()
            }
        };

        if mode == PickMode::Remove {
            self.remove(&picked[0].text);
        }

        self.history.push_front(PickHistoryEntry {
            mode,
            results: picked.clone(),
            timestamp: Utc::now(),
        });
        self.history.truncate(MAX_PICK_HISTORY);

        Ok(PickResult { mode, picked })
    }

    /// Pick using the thread-local generator.
    pub fn pick_random(&mut self, mode: PickMode) -> Result<PickResult, CoreError> {
        self.pick(mode, &mut rand::rng())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
