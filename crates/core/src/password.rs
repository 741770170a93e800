//! Password strength classification for the file encryptor.
//!
//! The score is one point per satisfied rule: length >= 8, length >= 12,
//! lowercase, uppercase, digit, and a non-alphanumeric symbol.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static LOWERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").expect("valid regex"));
static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").expect("valid regex"));
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").expect("valid regex"));
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").expect("valid regex"));

/// Minimum length before the weak-password hint is dropped.
pub const RECOMMENDED_MIN_LENGTH: usize = 8;
/// Length that earns the extra length point.
pub const LONG_PASSWORD_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Weak password",
            Self::Medium => "Medium password",
            Self::Strong => "Strong password",
        }
    }

    /// CSS-style class suffix used by the strength meter.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

/// Result of classifying a non-empty password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    pub strength: PasswordStrength,
    pub score: u8,
    /// First unmet recommendation, only reported for weak passwords.
    pub hint: Option<&'static str>,
}

impl StrengthReport {
    /// Meter text, e.g. `"Weak password - At least 8 characters"`.
    pub fn display_text(&self) -> String {
        match self.hint {
            Some(hint) => format!("{} - {hint}", self.strength.label()),
            None => self.strength.label().to_string(),
        }
    }
}

/// Classify a password. Returns `None` for an empty password, which clears
/// the meter.
pub fn classify(password: &str) -> Option<StrengthReport> {
    if password.is_empty() {
        return None;
    }

    let length = password.chars().count();
    let rules = [
        length >= RECOMMENDED_MIN_LENGTH,
        length >= LONG_PASSWORD_LENGTH,
        LOWERCASE_RE.is_match(password),
        UPPERCASE_RE.is_match(password),
        DIGIT_RE.is_match(password),
        SYMBOL_RE.is_match(password),
    ];
    let score = rules.iter().filter(|&&ok| ok).count() as u8;

    let strength = match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    };

    let hint = (strength == PasswordStrength::Weak && length < RECOMMENDED_MIN_LENGTH)
        .then_some("At least 8 characters");

    Some(StrengthReport {
        strength,
        score,
        hint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lowercase_is_weak() {
        let report = classify("abc").unwrap();
        assert_eq!(report.strength, PasswordStrength::Weak);
        assert_eq!(report.strength.label(), "Weak password");
        assert_eq!(report.display_text(), "Weak password - At least 8 characters");
    }

    #[test]
    fn mixed_classes_are_strong() {
        let report = classify("Abcdef12!@").unwrap();
        assert_eq!(report.score, 5);
        assert_eq!(report.strength, PasswordStrength::Strong);
        assert_eq!(report.display_text(), "Strong password");
    }

    #[test]
    fn medium_band() {
        // length>=8, lower, digit
        let report = classify("abcdefg1").unwrap();
        assert_eq!(report.score, 3);
        assert_eq!(report.strength, PasswordStrength::Medium);
        assert_eq!(report.hint, None);
    }

    #[test]
    fn length_earns_points_and_drops_hint() {
        let report = classify("aaaaaaaaaaaa").unwrap();
        assert_eq!(report.strength, PasswordStrength::Medium);

        let report = classify("aaaaaaaa").unwrap();
        assert_eq!(report.strength, PasswordStrength::Weak);
        assert_eq!(report.hint, None);
    }

    #[test]
    fn empty_password_clears_meter() {
        assert!(classify("").is_none());
    }

    #[test]
    fn non_ascii_counts_as_symbol() {
        let report = classify("é").unwrap();
        assert_eq!(report.score, 1);
    }
}
