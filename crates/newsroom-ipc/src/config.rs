//! Broadcast configuration, loaded externally and consumed read-only.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AnchorPersona;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The persona roster must contain exactly three entries.
    #[error("Expected exactly 3 anchor personas, got {0}")]
    PersonaCount(usize),

    /// Persona order must match the fixed rotation cycle.
    #[error("Persona at position {position} has kind {found}, expected {expected}")]
    PersonaOrder {
        position: usize,
        found: &'static str,
        expected: &'static str,
    },

    /// A timing value is negative or not a finite number.
    #[error("Invalid {name}: {value} (must be a finite, non-negative number of seconds)")]
    InvalidInterval { name: &'static str, value: f64 },

    /// A timing value must be strictly positive.
    #[error("Invalid {name}: {value} (must be greater than zero)")]
    NonPositiveInterval { name: &'static str, value: f64 },
}

/// Timing and persona configuration for a broadcast.
///
/// Durations are expressed in seconds in the TOML surface; fractional
/// values are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Seconds between feed polls.
    pub polling_interval_secs: f64,

    /// Minimum seconds between accepted story transitions. Zero disables
    /// debouncing.
    pub debounce_timeout_secs: f64,

    /// Seconds each anchor speaks before cycling.
    pub rotation_interval_secs: f64,

    /// Duration of the breaking-news window.
    pub transition_duration_secs: f64,

    /// Seconds between presentation frames (e.g. 1/30 for 30 fps).
    pub frame_interval_secs: f64,

    /// The anchor roster, in rotation order. Must be exactly three.
    pub personas: Vec<AnchorPersona>,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: 60.0,
            debounce_timeout_secs: 5.0,
            rotation_interval_secs: 30.0,
            transition_duration_secs: 2.0,
            frame_interval_secs: 1.0 / 30.0,
            personas: Vec::new(),
        }
    }
}

impl BroadcastConfig {
    /// Validate the configuration, failing fast on any invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.personas.len() != 3 {
            return Err(ConfigError::PersonaCount(self.personas.len()));
        }
        for (position, persona) in self.personas.iter().enumerate() {
            let expected = crate::types::PersonaKind::from_index(position);
            if persona.kind != expected {
                return Err(ConfigError::PersonaOrder {
                    position,
                    found: kind_name(persona.kind),
                    expected: kind_name(expected),
                });
            }
        }

        check_non_negative("polling_interval_secs", self.polling_interval_secs)?;
        check_non_negative("debounce_timeout_secs", self.debounce_timeout_secs)?;
        check_non_negative("transition_duration_secs", self.transition_duration_secs)?;
        check_positive("rotation_interval_secs", self.rotation_interval_secs)?;
        check_positive("frame_interval_secs", self.frame_interval_secs)?;

        Ok(())
    }

    /// Seconds between feed polls.
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs_f64(self.polling_interval_secs)
    }

    /// Minimum gap enforced between accepted story transitions.
    pub fn debounce_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.debounce_timeout_secs)
    }

    /// Time each anchor speaks before cycling.
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_secs_f64(self.rotation_interval_secs)
    }

    /// Duration of the breaking-news window.
    pub fn transition_duration(&self) -> Duration {
        Duration::from_secs_f64(self.transition_duration_secs)
    }

    /// Target gap between presentation frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(self.frame_interval_secs)
    }
}

fn kind_name(kind: crate::types::PersonaKind) -> &'static str {
    match kind {
        crate::types::PersonaKind::Headline => "Headline",
        crate::types::PersonaKind::Implication => "Implication",
        crate::types::PersonaKind::Context => "Context",
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidInterval { name, value });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check_non_negative(name, value)?;
    if value == 0.0 {
        return Err(ConfigError::NonPositiveInterval { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersonaKind;

    fn personas() -> Vec<AnchorPersona> {
        PersonaKind::ALL
            .iter()
            .enumerate()
            .map(|(i, &kind)| AnchorPersona {
                kind,
                name: format!("Anchor {}", ["A", "B", "C"][i]),
                focus: "focus".to_string(),
                perspective: "perspective".to_string(),
                color: "#FFFFFF".to_string(),
            })
            .collect()
    }

    fn valid_config() -> BroadcastConfig {
        BroadcastConfig {
            personas: personas(),
            ..BroadcastConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_wrong_persona_count_rejected() {
        let mut config = valid_config();
        config.personas.pop();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PersonaCount(2))
        ));

        let mut config = valid_config();
        config.personas.push(config.personas[0].clone());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PersonaCount(4))
        ));
    }

    #[test]
    fn test_out_of_order_personas_rejected() {
        let mut config = valid_config();
        config.personas.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PersonaOrder { position: 0, .. })
        ));
    }

    #[test]
    fn test_negative_interval_rejected() {
        let mut config = valid_config();
        config.debounce_timeout_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval {
                name: "debounce_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_debounce_allowed() {
        let mut config = valid_config();
        config.debounce_timeout_secs = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rotation_interval_rejected() {
        let mut config = valid_config();
        config.rotation_interval_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveInterval {
                name: "rotation_interval_secs",
                ..
            })
        ));
    }
}
