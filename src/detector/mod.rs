//! Threshold-based detection of suspicious commit transitions.

pub mod reason;
pub mod thresholds;

pub use reason::{Reason, ReasonKind};
pub use thresholds::Thresholds;

use crate::error::Result;
use crate::model::CommitPair;
use crate::velocity::velocity;
use chrono::TimeDelta;
use tracing::debug;

/// A commit pair that tripped at least one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousCommit {
    pub pair: CommitPair,
    /// Only computed when a velocity threshold is enabled.
    pub addition_velocity: Option<f64>,
    pub deletion_velocity: Option<f64>,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone)]
pub struct Detector {
    thresholds: Thresholds,
}

impl Detector {
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluates every pair independently; output keeps the input order.
    pub fn detect(&self, pairs: &[CommitPair]) -> Vec<SuspiciousCommit> {
        pairs.iter().filter_map(|pair| self.evaluate(pair)).collect()
    }

    fn evaluate(&self, pair: &CommitPair) -> Option<SuspiciousCommit> {
        let t = &self.thresholds;
        let stats = &pair.stats;

        if !stats.has_filtered_changes() {
            return None;
        }

        let (addition_velocity, deletion_velocity) = if t.velocity_enabled() {
            match (
                velocity(stats.additions, pair.time_delta),
                velocity(stats.deletions, pair.time_delta),
            ) {
                (Ok(add), Ok(del)) => (Some(add), Some(del)),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(commit = %pair.current.hash, error = %e, "skipping pair");
                    return None;
                }
            }
        } else {
            (None, None)
        };

        let mut reasons = Vec::new();

        if t.min_time_delta_seconds > 0 {
            let seconds = seconds_f64(pair.time_delta);
            if seconds < t.min_time_delta_seconds as f64 {
                reasons.push(Reason::new(
                    ReasonKind::ShortTimeDelta,
                    seconds,
                    t.min_time_delta_seconds as f64,
                ));
            }
        }

        if t.suspicious_additions > 0 && stats.additions > t.suspicious_additions as u64 {
            reasons.push(Reason::new(
                ReasonKind::LargeAdditions,
                stats.additions as f64,
                t.suspicious_additions as f64,
            ));
        }

        if t.suspicious_deletions > 0 && stats.deletions > t.suspicious_deletions as u64 {
            reasons.push(Reason::new(
                ReasonKind::LargeDeletions,
                stats.deletions as f64,
                t.suspicious_deletions as f64,
            ));
        }

        if let Some(v) = addition_velocity {
            if t.max_additions_per_min > 0.0 && v > t.max_additions_per_min {
                reasons.push(Reason::new(
                    ReasonKind::HighAdditionVelocity,
                    v,
                    t.max_additions_per_min,
                ));
            }
        }

        if let Some(v) = deletion_velocity {
            if t.max_deletions_per_min > 0.0 && v > t.max_deletions_per_min {
                reasons.push(Reason::new(
                    ReasonKind::HighDeletionVelocity,
                    v,
                    t.max_deletions_per_min,
                ));
            }
        }

        if reasons.is_empty() {
            return None;
        }

        Some(SuspiciousCommit {
            pair: pair.clone(),
            addition_velocity,
            deletion_velocity,
            reasons,
        })
    }
}

pub(crate) fn seconds_f64(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Human form of a commit gap, e.g. "0.50 minutes" or "5.5 minutes".
pub fn format_time_delta(delta: TimeDelta) -> String {
    let minutes = seconds_f64(delta) / 60.0;
    if minutes < 1.0 {
        format!("{minutes:.2} minutes")
    } else {
        format!("{minutes:.1} minutes")
    }
}
