use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    ShortTimeDelta,
    LargeAdditions,
    LargeDeletions,
    HighAdditionVelocity,
    HighDeletionVelocity,
}

/// One criterion that fired, with the observed value and the limit it crossed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub kind: ReasonKind,
    pub observed: f64,
    pub threshold: f64,
}

impl Reason {
    pub fn new(kind: ReasonKind, observed: f64, threshold: f64) -> Self {
        Self {
            kind,
            observed,
            threshold,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReasonKind::ShortTimeDelta => write!(
                f,
                "Time between commits too short: {:.1} seconds (threshold: {} seconds)",
                self.observed, self.threshold as i64
            ),
            ReasonKind::LargeAdditions => write!(
                f,
                "Suspicious commit size: {} additions (threshold: {} lines)",
                self.observed as u64, self.threshold as i64
            ),
            ReasonKind::LargeDeletions => write!(
                f,
                "Suspicious commit size: {} deletions (threshold: {} lines)",
                self.observed as u64, self.threshold as i64
            ),
            ReasonKind::HighAdditionVelocity => write!(
                f,
                "Addition velocity too high: {:.1} additions/min (threshold: {:.1} additions/min)",
                self.observed, self.threshold
            ),
            ReasonKind::HighDeletionVelocity => write!(
                f,
                "Deletion velocity too high: {:.1} deletions/min (threshold: {:.1} deletions/min)",
                self.observed, self.threshold
            ),
        }
    }
}
