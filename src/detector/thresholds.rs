use crate::error::{Result, VibeError};
use serde::{Deserialize, Serialize};

/// Detection policy. A zero value disables the matching criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub suspicious_additions: i64,
    pub suspicious_deletions: i64,
    pub max_additions_per_min: f64,
    pub max_deletions_per_min: f64,
    pub min_time_delta_seconds: i64,
}

impl Thresholds {
    pub const DISABLED: Thresholds = Thresholds {
        suspicious_additions: 0,
        suspicious_deletions: 0,
        max_additions_per_min: 0.0,
        max_deletions_per_min: 0.0,
        min_time_delta_seconds: 0,
    };

    pub fn validate(&self) -> Result<()> {
        if self.suspicious_additions < 0 {
            return Err(negative("suspicious_additions"));
        }
        if self.suspicious_deletions < 0 {
            return Err(negative("suspicious_deletions"));
        }
        if invalid_rate(self.max_additions_per_min) {
            return Err(negative("max_additions_per_min"));
        }
        if invalid_rate(self.max_deletions_per_min) {
            return Err(negative("max_deletions_per_min"));
        }
        if self.min_time_delta_seconds < 0 {
            return Err(negative("min_time_delta_seconds"));
        }
        if self.is_zero() {
            return Err(VibeError::InvalidThresholds(
                "at least one threshold must be configured".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.suspicious_additions == 0
            && self.suspicious_deletions == 0
            && self.max_additions_per_min == 0.0
            && self.max_deletions_per_min == 0.0
            && self.min_time_delta_seconds == 0
    }

    pub(crate) fn velocity_enabled(&self) -> bool {
        self.max_additions_per_min > 0.0 || self.max_deletions_per_min > 0.0
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            suspicious_additions: 500,
            suspicious_deletions: 1000,
            max_additions_per_min: 100.0,
            max_deletions_per_min: 500.0,
            min_time_delta_seconds: 60,
        }
    }
}

fn invalid_rate(rate: f64) -> bool {
    rate.is_nan() || rate < 0.0
}

fn negative(field: &str) -> VibeError {
    VibeError::InvalidThresholds(format!("{field} cannot be negative"))
}
