//! Score bands for hook analysis results.

use serde::Serialize;

/// Lower bound of the `excellent` band.
pub const EXCELLENT_MIN_SCORE: f64 = 80.0;
/// Lower bound of the `good` band.
pub const GOOD_MIN_SCORE: f64 = 60.0;
/// Lower bound of the `fair` band.
pub const FAIR_MIN_SCORE: f64 = 40.0;

/// Band a 0-100 hook score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookScoreCategory {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HookScoreCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_MIN_SCORE {
            Self::Excellent
        } else if score >= GOOD_MIN_SCORE {
            Self::Good
        } else if score >= FAIR_MIN_SCORE {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// CSS-style class suffix of the score circle.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    /// Text colour for a score in this band.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Excellent => "#55ff55",
            Self::Good | Self::Fair => "#ffaa00",
            Self::Poor => "#ff5555",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Test: band boundaries
    // -----------------------------------------------------------------------

    #[test]
    fn bands_are_inclusive_at_lower_bound() {
        assert_eq!(HookScoreCategory::from_score(100.0), HookScoreCategory::Excellent);
        assert_eq!(HookScoreCategory::from_score(80.0), HookScoreCategory::Excellent);
        assert_eq!(HookScoreCategory::from_score(79.9), HookScoreCategory::Good);
        assert_eq!(HookScoreCategory::from_score(60.0), HookScoreCategory::Good);
        assert_eq!(HookScoreCategory::from_score(59.0), HookScoreCategory::Fair);
        assert_eq!(HookScoreCategory::from_score(40.0), HookScoreCategory::Fair);
        assert_eq!(HookScoreCategory::from_score(39.5), HookScoreCategory::Poor);
        assert_eq!(HookScoreCategory::from_score(0.0), HookScoreCategory::Poor);
    }

    #[test]
    fn fair_and_good_share_a_colour() {
        assert_eq!(HookScoreCategory::Good.color(), HookScoreCategory::Fair.color());
        assert_eq!(HookScoreCategory::Excellent.as_str(), "excellent");
        assert_eq!(HookScoreCategory::Poor.color(), "#ff5555");
    }
}
