use std::time::Duration;

use crate::{Error, Result};

/// Comfort range accepted for numeric heating targets, in °C.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeatingRange {
    min_c: f32,
    max_c: f32,
}

impl HeatingRange {
    pub fn new(min_c: f32, max_c: f32) -> Result<Self> {
        if !min_c.is_finite() || !max_c.is_finite() {
            return Err(Error::InvalidConfig("heating bounds must be finite"));
        }

        if min_c >= max_c {
            return Err(Error::InvalidConfig(
                "minimum heating target must be below the maximum",
            ));
        }

        Ok(Self { min_c, max_c })
    }

    pub fn min_c(&self) -> f32 {
        self.min_c
    }

    pub fn max_c(&self) -> f32 {
        self.max_c
    }

    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && self.min_c <= value && value <= self.max_c
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min_c, self.max_c)
    }
}

impl Default for HeatingRange {
    fn default() -> Self {
        Self {
            min_c: 5.0,
            max_c: 35.0,
        }
    }
}

/// How the sync worker retries a failed backend request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1 << shift)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            max_attempts: 4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    pub heating_range: HeatingRange,
    /// Target used when a room's heating is switched on from `Off`.
    pub default_heating_c: f32,
    /// Target sent to the hub when the master heating switch goes on.
    pub master_heating_c: f32,
    pub heating_step_c: f32,
    pub light_step: u8,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.heating_range.contains(self.default_heating_c) {
            return Err(Error::InvalidConfig(
                "default heating target is outside the heating range",
            ));
        }

        if !self.heating_range.contains(self.master_heating_c) {
            return Err(Error::InvalidConfig(
                "master heating target is outside the heating range",
            ));
        }

        if !(self.heating_step_c.is_finite() && self.heating_step_c > 0.0) {
            return Err(Error::InvalidConfig("heating step must be positive"));
        }

        if self.light_step == 0 || self.light_step > 100 {
            return Err(Error::InvalidConfig("light step must be within 1..=100"));
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfig("at least one sync attempt is required"));
        }

        if self.retry.timeout.is_zero() {
            return Err(Error::InvalidConfig("sync timeout must not be zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heating_range: HeatingRange::default(),
            default_heating_c: 21.0,
            master_heating_c: 21.0,
            heating_step_c: 0.5,
            light_step: 10,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_heating_range_rejects_inverted_bounds() {
        assert!(HeatingRange::new(30.0, 10.0).is_err());
        assert!(HeatingRange::new(10.0, 10.0).is_err());
        assert!(HeatingRange::new(f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_heating_range_contains_bounds() {
        let range = HeatingRange::new(5.0, 35.0).unwrap();

        assert!(range.contains(5.0));
        assert!(range.contains(35.0));
        assert!(!range.contains(4.9));
        assert!(!range.contains(f32::INFINITY));
        assert_eq!(range.clamp(40.0), 35.0);
    }

    #[test]
    fn test_default_outside_range_is_rejected() {
        let config = Config {
            heating_range: HeatingRange::new(16.0, 20.0).unwrap(),
            ..Config::default()
        };

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
        assert_eq!(policy.backoff(5), Duration::from_secs(8));
        assert_eq!(policy.backoff(30), Duration::from_secs(8));
    }
}
