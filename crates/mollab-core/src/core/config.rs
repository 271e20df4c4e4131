use crate::core::utils::geometry::DEFAULT_AXIS_TOLERANCE;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_UNDEFINED_GROUP_KEY: &str = "UNDEFINED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Failed to parse engine configuration: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

/// How [`ParticleStore::separate_with`](crate::core::models::store::ParticleStore::separate_with)
/// treats a mode string it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparationPolicy {
    /// Fail with `UnknownSeparationMode` before moving anything.
    #[default]
    Strict,
    /// Log a warning and leave both particles where they are.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Axis vectors with a norm at or below this value are rejected by rotations.
    pub axis_tolerance: f64,
    pub separation_policy: SeparationPolicy,
    /// Group key assigned to particles lacking the grouping attribute.
    pub undefined_group_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: DEFAULT_AXIS_TOLERANCE,
            separation_policy: SeparationPolicy::default(),
            undefined_group_key: DEFAULT_UNDEFINED_GROUP_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document; keys that are absent keep their defaults.
    ///
    /// ```toml
    /// axis-tolerance = 1e-10
    /// separation-policy = "lenient"
    /// undefined-group-key = "UNKNOWN"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.axis_tolerance.is_finite() || self.axis_tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "axis_tolerance",
                reason: format!(
                    "must be a finite, non-negative number (got {})",
                    self.axis_tolerance
                ),
            });
        }
        if self.undefined_group_key.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "undefined_group_key",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    axis_tolerance: Option<f64>,
    separation_policy: Option<SeparationPolicy>,
    undefined_group_key: Option<String>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis_tolerance(mut self, tolerance: f64) -> Self {
        self.axis_tolerance = Some(tolerance);
        self
    }
    pub fn separation_policy(mut self, policy: SeparationPolicy) -> Self {
        self.separation_policy = Some(policy);
        self
    }
    pub fn undefined_group_key(mut self, key: &str) -> Self {
        self.undefined_group_key = Some(key.to_string());
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            axis_tolerance: self.axis_tolerance.unwrap_or(defaults.axis_tolerance),
            separation_policy: self
                .separation_policy
                .unwrap_or(defaults.separation_policy),
            undefined_group_key: self
                .undefined_group_key
                .unwrap_or(defaults.undefined_group_key),
        };
        config.validate()?;
        Ok(config)
    }
}
