//! Top-level analysis configuration
//!
//! Preset first, then per-stage overrides:
//!
//! ```rust,ignore
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .pta(|c| c.context(ContextStrategy::CallSite(2)))
//!     .build()?;
//! ```

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, ConfigOverrides, SUPPORTED_VERSIONS};
use super::preset::Preset;
use super::stage_configs::{DataflowConfig, PTAConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Preset plus optional stage overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    preset: Preset,
    pta: Option<PTAConfig>,
    dataflow: Option<DataflowConfig>,
}

impl AnalysisConfig {
    /// Level 1: start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            pta: None,
            dataflow: None,
        }
    }

    /// Level 2: override the points-to stage
    pub fn pta<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PTAConfig) -> PTAConfig,
    {
        let base = self.pta.take().unwrap_or_else(|| PTAConfig::from_preset(self.preset));
        self.pta = Some(f(base));
        self
    }

    /// Level 2: override the dataflow stage
    pub fn dataflow<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DataflowConfig) -> DataflowConfig,
    {
        let base = self
            .dataflow
            .take()
            .unwrap_or_else(|| DataflowConfig::from_preset(self.preset));
        self.dataflow = Some(f(base));
        self
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Effective points-to config
    pub fn pta_config(&self) -> PTAConfig {
        self.pta
            .clone()
            .unwrap_or_else(|| PTAConfig::from_preset(self.preset))
    }

    /// Effective dataflow config
    pub fn dataflow_config(&self) -> DataflowConfig {
        self.dataflow
            .clone()
            .unwrap_or_else(|| DataflowConfig::from_preset(self.preset))
    }

    /// Validate every stage
    pub fn validate(&self) -> ConfigResult<()> {
        self.pta_config().validate()
    }

    /// Validate and return self
    pub fn build(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Level 3: load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Level 3: load from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or_else(|| ConfigError::Validation("'version' must be an integer".to_string()))?;
        let version = u32::try_from(version)
            .map_err(|_| ConfigError::Validation(format!("'version' {} out of range", version)))?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let export: ConfigExportV1 = serde_yaml::from_value(raw)?;
        let preset: Preset = export.preset.parse()?;
        let overrides = export.overrides.unwrap_or_default();

        Self {
            preset,
            pta: overrides.pta,
            dataflow: overrides.dataflow,
        }
        .build()
    }

    /// Export as YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let overrides = ConfigOverrides {
            pta: self.pta.clone(),
            dataflow: self.dataflow.clone(),
        };
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            overrides: (overrides.pta.is_some() || overrides.dataflow.is_some())
                .then_some(overrides),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::stage_configs::ContextStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_preset_defaults() {
        let config = AnalysisConfig::preset(Preset::Fast);
        assert_eq!(config.pta_config().context, ContextStrategy::Insensitive);
        assert!(config.dataflow_config().alias_aware);
    }

    #[test]
    fn test_override_keeps_preset_base() {
        let config = AnalysisConfig::preset(Preset::Thorough).pta(|c| c.context(ContextStrategy::Type(2)));
        let pta = config.pta_config();
        assert_eq!(pta.context, ContextStrategy::Type(2));
        assert_eq!(pta.heap_context_depth, Some(1));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AnalysisConfig::preset(Preset::Balanced)
            .pta(|c| c.context(ContextStrategy::CallSite(2)))
            .dataflow(|c| c.alias_aware(false));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: balanced"));
        assert!(yaml.contains("call_site"));

        let loaded = AnalysisConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_loading_from_file() {
        let yaml_content = r#"
version: 1
preset: fast
overrides:
  pta:
    context:
      kind: object
      k: 2
    heap_context_depth: 1
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = AnalysisConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.get_preset(), Preset::Fast);
        assert_eq!(config.pta_config().context, ContextStrategy::Object(2));
        assert_eq!(config.pta_config().heap_context_depth, Some(1));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EDGE CASES
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_yaml_missing_version() {
        let result = AnalysisConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = AnalysisConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_version_beyond_u32_rejected() {
        // 2^32 + 1 must not wrap around to version 1
        let result = AnalysisConfig::from_yaml_str("version: 4294967297\npreset: fast\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let yaml = "version: 1\npreset: fast\noverrides:\n  pta:\n    max_iterations: 3\n";
        assert!(matches!(
            AnalysisConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_invalid_override_rejected() {
        let yaml = r#"
version: 1
preset: balanced
overrides:
  pta:
    context:
      kind: call_site
      k: 1
    heap_context_depth: 4
"#;
        assert!(matches!(
            AnalysisConfig::from_yaml_str(yaml),
            Err(ConfigError::Conflict { .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_preset() {
        let result = AnalysisConfig::from_yaml_str("version: 1\npreset: turbo\n");
        assert!(matches!(result, Err(ConfigError::UnknownPreset(_))));
    }
}
