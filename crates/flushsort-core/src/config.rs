//! Sorter runtime configuration.

use crate::error::{ErrorClass, ErrorOrigin, SortError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// SorterConfig
///
/// Behavioral switches for instance ordering and index lifecycle.
/// Every key is optional; unknown keys are rejected.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SorterConfig {
    /// Read unset master references of permanent objects from the row
    /// snapshot cache.
    pub resolve_from_snapshots: bool,

    /// Use the object's own current row when the snapshot cache has none.
    pub current_row_fallback: bool,

    /// Build the index as soon as a schema is installed.
    pub eager_index: bool,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            resolve_from_snapshots: true,
            current_row_fallback: true,
            eager_index: false,
        }
    }
}

impl SorterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(ConfigError::from)
    }
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid sorter config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<ConfigError> for SortError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Config, err.to_string())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config = SorterConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, SorterConfig::default());
        assert!(config.resolve_from_snapshots);
        assert!(config.current_row_fallback);
        assert!(!config.eager_index);
    }

    #[test]
    fn partial_source_overrides_named_keys() {
        let config = SorterConfig::from_toml_str("eager_index = true\ncurrent_row_fallback = false")
            .expect("partial config should parse");

        assert!(config.resolve_from_snapshots);
        assert!(!config.current_row_fallback);
        assert!(config.eager_index);
    }

    #[test]
    fn unknown_key_is_a_configuration_error() {
        let err: SortError = SorterConfig::from_toml_str("eager = true")
            .expect_err("unknown key should be rejected")
            .into();

        assert!(err.is_configuration());
        assert_eq!(err.origin, ErrorOrigin::Config);
        assert!(err.message.starts_with("invalid sorter config"));
    }

    #[test]
    fn mistyped_value_is_rejected() {
        assert!(SorterConfig::from_toml_str("eager_index = \"yes\"").is_err());
    }
}
