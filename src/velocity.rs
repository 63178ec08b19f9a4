use crate::error::{Result, VibeError};
use chrono::TimeDelta;

/// Lines changed per minute over `time_delta`.
pub fn velocity(lines: u64, time_delta: TimeDelta) -> Result<f64> {
    if time_delta <= TimeDelta::zero() {
        return Err(VibeError::InvalidTimeDelta(time_delta));
    }
    let minutes = time_delta.num_milliseconds() as f64 / 60_000.0;
    Ok(lines as f64 / minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_per_minute() {
        let v = velocity(100, TimeDelta::minutes(2)).unwrap();
        assert!((v - 50.0).abs() < f64::EPSILON);

        let v = velocity(30, TimeDelta::seconds(30)).unwrap();
        assert!((v - 60.0).abs() < 1e-9);
    }

    #[test]
    fn zero_lines_is_zero_rate() {
        assert_eq!(velocity(0, TimeDelta::seconds(1)).unwrap(), 0.0);
        assert_eq!(velocity(0, TimeDelta::hours(5)).unwrap(), 0.0);
    }

    #[test]
    fn rejects_non_positive_delta() {
        assert!(matches!(
            velocity(10, TimeDelta::zero()),
            Err(VibeError::InvalidTimeDelta(_))
        ));
        assert!(matches!(
            velocity(0, TimeDelta::seconds(-5)),
            Err(VibeError::InvalidTimeDelta(_))
        ));
    }
}
