//! Simulation configuration
//!
//! Read once when the world is built and never changed afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How starting vitality is chosen for every new organism.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HealthPolicy {
    /// Every organism starts with `value`.
    Fixed { value: i32 },
    /// Uniform draw from `[min, max)`.
    Random { min: i32, max: i32 },
}

impl Default for HealthPolicy {
    fn default() -> Self {
        HealthPolicy::Fixed { value: 3 }
    }
}

/// How founders get their kind. Offspring always inherit.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KindPolicy {
    /// First half of the founders are `B`, the rest `A`.
    #[default]
    FixedSplit,
    /// Each founder is `A` or `B` with equal odds.
    Random,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Organisms created in generation 0.
    pub founder_count: usize,
    pub health_policy: HealthPolicy,
    pub kind_policy: KindPolicy,
    /// Children each recorded pair produces per generation.
    pub offspring_per_pair: u32,
    /// Partner search gives up after this many draws per member of the
    /// seeker's generation.
    pub search_attempts_per_member: usize,
    /// Events retained by the event log before the oldest are dropped.
    pub event_log_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            founder_count: 20,
            health_policy: HealthPolicy::default(),
            kind_policy: KindPolicy::default(),
            offspring_per_pair: 1,
            search_attempts_per_member: 4,
            event_log_capacity: 1000,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fixed starting health must be positive, got {0}")]
    NonPositiveHealth(i32),
    #[error("random health range [{min}, {max}) is empty")]
    EmptyHealthRange { min: i32, max: i32 },
    #[error("random health range must start above zero, got {0}")]
    NonPositiveHealthRange(i32),
    #[error("search_attempts_per_member must be greater than 0")]
    NoSearchAttempts,
    #[error("invalid config JSON: {0}")]
    Parse(String),
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.health_policy {
            HealthPolicy::Fixed { value } if value <= 0 => {
                return Err(ConfigError::NonPositiveHealth(value));
            }
            HealthPolicy::Random { min, max } if min >= max => {
                return Err(ConfigError::EmptyHealthRange { min, max });
            }
            HealthPolicy::Random { min, .. } if min <= 0 => {
                return Err(ConfigError::NonPositiveHealthRange(min));
            }
            _ => {}
        }
        if self.search_attempts_per_member == 0 {
            return Err(ConfigError::NoSearchAttempts);
        }
        Ok(())
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_health() {
        let config = SimConfig {
            health_policy: HealthPolicy::Fixed { value: 0 },
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveHealth(0)));

        let config = SimConfig {
            health_policy: HealthPolicy::Random { min: 4, max: 4 },
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyHealthRange { min: 4, max: 4 })
        );

        let config = SimConfig {
            health_policy: HealthPolicy::Random { min: 0, max: 4 },
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveHealthRange(0)));
    }

    #[test]
    fn test_rejects_zero_search_attempts() {
        let config = SimConfig {
            search_attempts_per_member: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSearchAttempts));
    }

    #[test]
    fn test_json_fills_defaults() {
        let config = SimConfig::from_json_str(
            r#"{"founder_count": 4, "health_policy": {"mode": "random", "min": 2, "max": 5}, "kind_policy": "random"}"#,
        )
        .unwrap();
        assert_eq!(config.founder_count, 4);
        assert_eq!(config.health_policy, HealthPolicy::Random { min: 2, max: 5 });
        assert_eq!(config.kind_policy, KindPolicy::Random);
        assert_eq!(config.offspring_per_pair, 1);
        assert_eq!(config.search_attempts_per_member, 4);
    }

    #[test]
    fn test_json_is_validated() {
        let err = SimConfig::from_json_str(r#"{"health_policy": {"mode": "fixed", "value": -1}}"#)
            .unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveHealth(-1));
        assert!(matches!(
            SimConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
