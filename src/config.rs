//! Registry configuration.
//!
//! Settings come from code, from the environment, or (with the `config`
//! feature) from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum depth of nested builds.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable holding [`RegistryConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "IOC_REGISTRY_MAX_DEPTH";
/// Environment variable holding [`RegistryConfig::log_resolutions`].
pub const ENV_LOG_RESOLUTIONS: &str = "IOC_REGISTRY_LOG_RESOLUTIONS";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value of the wrong kind
    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    /// `max_depth` must allow at least one build
    #[error("max_depth must be greater than zero")]
    ZeroDepth,
    #[cfg(feature = "config")]
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables of a registry tree. Forks inherit their parent's configuration.
///
/// # Examples
///
/// ```
/// use ioc_registry::{Registry, RegistryConfig};
///
/// let config = RegistryConfig {
///     max_depth: 64,
///     ..RegistryConfig::default()
/// };
/// let registry = Registry::with_config(config);
/// assert_eq!(registry.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryConfig {
    /// Deepest chain of nested builds before resolution fails with
    /// [`DiError::DepthExceeded`](crate::DiError::DepthExceeded)
    pub max_depth: usize,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) on the registry
    pub log_resolutions: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_resolutions: false,
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `IOC_REGISTRY_MAX_DEPTH` and
    /// `IOC_REGISTRY_LOG_RESOLUTIONS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var(ENV_MAX_DEPTH) {
            config.max_depth = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MAX_DEPTH,
                value: value.clone(),
                expected: "a positive integer",
            })?;
        }

        if let Ok(value) = env::var(ENV_LOG_RESOLUTIONS) {
            config.log_resolutions = parse_flag(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_LOG_RESOLUTIONS,
                value: value.clone(),
                expected: "true/false, 1/0, yes/no or on/off",
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON object; missing fields keep their defaults.
    ///
    /// ```
    /// use ioc_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::from_json(r#"{ "log_resolutions": true }"#).unwrap();
    /// assert!(config.log_resolutions);
    /// assert_eq!(config.max_depth, 1024);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let config = RegistryConfig {
            max_depth: 0,
            log_resolutions: false,
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDepth)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_rejects_wrong_types() {
        let err = RegistryConfig::from_json(r#"{ "max_depth": "deep" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
