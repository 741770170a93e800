//! Progress bar view model derived from a `processing` status.

use serde::Serialize;

/// What a progress bar shows for one status observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    /// Bar fill, clamped to `[0, 100]`.
    pub percent: u8,
    /// Bar label, e.g. `"42%"`.
    pub text: String,
    /// Status line under the bar.
    pub message: String,
}

impl ProgressView {
    /// Build a view from the raw `progress` / `message` fields.
    ///
    /// Missing progress renders as 0 and missing message falls back to
    /// `fallback_message`.
    pub fn from_status(progress: Option<f64>, message: Option<&str>, fallback_message: &str) -> Self {
        let percent = clamp_percent(progress.unwrap_or(0.0));
        let message = match message {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback_message.to_string(),
        };
        Self {
            percent,
            text: format!("{percent}%"),
            message,
        }
    }

    /// Append a `(x MB / y MB)` transfer suffix when both figures are known.
    pub fn with_transfer(mut self, downloaded_mb: Option<f64>, total_mb: Option<f64>) -> Self {
        if let (Some(done), Some(total)) = (downloaded_mb, total_mb) {
            self.message = format!("{} ({done} MB / {total} MB)", self.message);
        }
        self
    }

    /// The view shown right after submission, before the first poll.
    pub fn initial(message: &str) -> Self {
        Self {
            percent: 0,
            text: "0%".to_string(),
            message: message.to_string(),
        }
    }
}

fn clamp_percent(progress: f64) -> u8 {
    if progress.is_nan() {
        return 0;
    }
    progress.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_status_renders_percent_and_message() {
        let view = ProgressView::from_status(Some(42.0), Some("Scanning..."), "Processing...");
        assert_eq!(view.percent, 42);
        assert_eq!(view.text, "42%");
        assert_eq!(view.message, "Scanning...");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let view = ProgressView::from_status(None, None, "Scanning...");
        assert_eq!(view.text, "0%");
        assert_eq!(view.message, "Scanning...");
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(ProgressView::from_status(Some(140.0), None, "").percent, 100);
        assert_eq!(ProgressView::from_status(Some(-3.0), None, "").percent, 0);
        assert_eq!(ProgressView::from_status(Some(f64::NAN), None, "").percent, 0);
    }

    #[test]
    fn fractional_progress_rounds() {
        assert_eq!(ProgressView::from_status(Some(33.6), None, "").text, "34%");
    }

    #[test]
    fn transfer_suffix_requires_both_figures() {
        let view = ProgressView::from_status(Some(10.0), Some("Downloading..."), "")
            .with_transfer(Some(12.5), Some(100.0));
        assert_eq!(view.message, "Downloading... (12.5 MB / 100 MB)");

        let view = ProgressView::from_status(Some(10.0), Some("Downloading..."), "")
            .with_transfer(Some(12.5), None);
        assert_eq!(view.message, "Downloading...");
    }
}
