//! Animation constants for a progress cycle.
//!
//! ## Usage
//!
//! Tune how fast the bar fills, where it idles and how long it lingers at
//! 100% before hiding.

use std::time::Duration;

use derive_setters::Setters;

use crate::ProgressError;

/// Value the bar snaps to when a cycle completes.
pub const COMPLETE_VALUE: f32 = 100.0;

/// Arguments for a [`ProgressProvider`](crate::ProgressProvider).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use porsesh_progress::ProgressConfig;
///
/// let config = ProgressConfig::default()
///     .ceiling(80.0)
///     .safety_timeout(None)
///     .tick_interval(Duration::from_millis(50));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Setters)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ProgressConfig {
    /// Value shown as soon as a cycle starts, so the bar appears instantly.
    pub start_value: f32,
    /// Highest value the automatic ticker reaches before an explicit completion.
    pub ceiling: f32,
    /// Cadence of the increment loop.
    #[cfg_attr(feature = "serde", serde(with = "millis", rename = "tick_interval_ms"))]
    pub tick_interval: Duration,
    /// Lower bound (inclusive) of the random increment per tick.
    pub min_increment: f32,
    /// Upper bound (exclusive) of the random increment per tick.
    pub max_increment: f32,
    /// How long the bar stays at 100% before hiding.
    #[cfg_attr(feature = "serde", serde(with = "millis", rename = "hide_delay_ms"))]
    pub hide_delay: Duration,
    /// Forces completion this long after a start. `None` idles at the ceiling
    /// until the cycle is completed explicitly.
    #[cfg_attr(
        feature = "serde",
        serde(with = "opt_millis", rename = "safety_timeout_ms")
    )]
    pub safety_timeout: Option<Duration>,
    /// Seed for the increment generator; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            start_value: 10.0,
            ceiling: 90.0,
            tick_interval: Duration::from_millis(100),
            min_increment: 0.0,
            max_increment: 15.0,
            hide_delay: Duration::from_millis(200),
            safety_timeout: Some(Duration::from_millis(600)),
            seed: None,
        }
    }
}

impl ProgressConfig {
    /// Checks that the constants describe a cycle that can run and finish.
    pub fn validate(&self) -> Result<(), ProgressError> {
        let invalid = |msg: String| Err(ProgressError::InvalidConfig(msg));

        if self.tick_interval.is_zero() {
            return invalid("tick_interval must be greater than zero".into());
        }
        if !(0.0..=COMPLETE_VALUE).contains(&self.start_value) {
            return invalid(format!(
                "start_value {} is outside 0..=100",
                self.start_value
            ));
        }
        if !(self.ceiling > self.start_value && self.ceiling <= COMPLETE_VALUE) {
            return invalid(format!(
                "ceiling {} must be above start_value {} and at most 100",
                self.ceiling, self.start_value
            ));
        }
        if self.min_increment < 0.0 || self.max_increment < self.min_increment {
            return invalid(format!(
                "increment range {}..{} is not a non-negative range",
                self.min_increment, self.max_increment
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(feature = "serde")]
mod opt_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ProgressConfig;
    use crate::ProgressError;

    #[test]
    fn default_config_matches_navigation_constants() {
        let config = ProgressConfig::default();
        assert_eq!(config.start_value, 10.0);
        assert_eq!(config.ceiling, 90.0);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.hide_delay, Duration::from_millis(200));
        assert_eq!(config.safety_timeout, Some(Duration::from_millis(600)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = ProgressConfig::default().tick_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ProgressError::InvalidConfig(_))
        ));
    }

    #[test]
    fn ceiling_must_sit_between_start_and_complete() {
        assert!(ProgressConfig::default().ceiling(5.0).validate().is_err());
        assert!(ProgressConfig::default().ceiling(120.0).validate().is_err());
        assert!(ProgressConfig::default().ceiling(100.0).validate().is_ok());
    }

    #[test]
    fn inverted_increment_range_is_rejected() {
        let config = ProgressConfig::default()
            .min_increment(8.0)
            .max_increment(2.0);
        assert!(config.validate().is_err());
        let negative = ProgressConfig::default().min_increment(-1.0);
        assert!(negative.validate().is_err());
    }
}
