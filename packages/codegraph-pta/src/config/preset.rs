//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Quick whole-program pass
    ///
    /// - PTA: context-insensitive
    /// - Dataflow: alias-aware heap handling
    Fast,

    /// Default precision/cost trade-off
    ///
    /// - PTA: 1-object sensitivity, no heap context
    /// - Dataflow: alias-aware heap handling
    #[default]
    Balanced,

    /// Precise analysis
    ///
    /// - PTA: 2-object sensitivity with 1-level heap context
    /// - Dataflow: alias-aware heap handling
    Thorough,
}

impl Preset {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!("fast".parse::<Preset>().unwrap(), Preset::Fast);
        assert_eq!("FAST".parse::<Preset>().unwrap(), Preset::Fast);
        assert_eq!("balanced".parse::<Preset>().unwrap(), Preset::Balanced);
        assert_eq!("thorough".parse::<Preset>().unwrap(), Preset::Thorough);
        assert!(matches!(
            "custom".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(Preset::Fast.to_string(), "fast");
        assert_eq!(Preset::Balanced.to_string(), "balanced");
        assert_eq!(Preset::Thorough.to_string(), "thorough");
    }

    #[test]
    fn test_default_preset() {
        assert_eq!(Preset::default(), Preset::Balanced);
    }
}
