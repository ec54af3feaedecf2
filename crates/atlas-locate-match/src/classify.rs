//! Two-band acceptance policy over (distinctiveness, score).

use atlas_locate_core::MAX_COLOR_DIFF;
use serde::{Deserialize, Serialize};

use crate::LocateError;

/// Result of classifying one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The match is trustworthy; the resolved position may be used.
    Successful,
    /// The correlation is adequate but the capture is not distinctive enough
    /// to rule out a match against generic content.
    Ambiguous,
    /// The correlation is too weak.
    Failed,
}

impl MatchOutcome {
    #[inline]
    pub fn is_successful(self) -> bool {
        matches!(self, MatchOutcome::Successful)
    }
}

/// Acceptance thresholds.
///
/// Scores below `score_low` always fail. In the mid band
/// `[score_low, score_high)` a match needs `distinct_mid`; at or above
/// `score_high` it needs `distinct_high`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub score_low: f32,
    pub score_high: f32,
    pub distinct_mid: f32,
    pub distinct_high: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            score_low: 0.40,
            score_high: 0.75,
            distinct_mid: 70.0,
            distinct_high: 30.0,
        }
    }
}

impl ConfidenceThresholds {
    pub fn validate(&self) -> Result<(), LocateError> {
        let scores_ok = self.score_low > 0.0
            && self.score_low < self.score_high
            && self.score_high < 1.0;
        if !scores_ok {
            return Err(LocateError::InvalidThresholds {
                reason: "expected 0 < score_low < score_high < 1",
            });
        }
        let in_range = |d: f32| (0.0..=MAX_COLOR_DIFF).contains(&d);
        if !in_range(self.distinct_mid) || !in_range(self.distinct_high) {
            return Err(LocateError::InvalidThresholds {
                reason: "distinctiveness thresholds must lie in [0, MAX_COLOR_DIFF]",
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceClassifier {
    thresholds: ConfidenceThresholds,
}

impl ConfidenceClassifier {
    pub fn new(thresholds: ConfidenceThresholds) -> Result<Self, LocateError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    #[inline]
    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.thresholds
    }

    /// Distinctiveness needed to accept `score`, `None` if no amount suffices.
    pub fn required_distinctiveness(&self, score: f32) -> Option<f32> {
        let t = &self.thresholds;
        if score.is_nan() || score < t.score_low {
            None
        } else if score < t.score_high {
            Some(t.distinct_mid)
        } else {
            Some(t.distinct_high)
        }
    }

    pub fn classify(&self, distinctiveness: f32, score: f32) -> MatchOutcome {
        match self.required_distinctiveness(score) {
            None => MatchOutcome::Failed,
            Some(required) if distinctiveness >= required => MatchOutcome::Successful,
            Some(_) => MatchOutcome::Ambiguous,
        }
    }
}
