use serde::{Deserialize, Serialize};

use crate::error::{FrostError, FrostResult};
use crate::math::Dimension;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Name of the composed distance evaluator.
    pub entry_point: String,
    pub dimension: Dimension,
    /// Fractional digits written for float literals.
    pub precision: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            entry_point: "map".to_string(),
            dimension: Dimension::Three,
            precision: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String, // tracing EnvFilter directive, e.g. "info" or "frost_lang=trace"
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FrostConfig {
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl FrostConfig {
    pub fn from_toml_str(contents: &str) -> FrostResult<Self> {
        let config: FrostConfig =
            toml::from_str(contents).map_err(|e| FrostError::Config(e.to_string()))?;
        if config.codegen.entry_point.trim().is_empty() {
            return Err(FrostError::Config("codegen.entry_point must not be empty".into()));
        }
        Ok(config)
    }

    pub fn load_from_file(path: &std::path::Path) -> FrostResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FrostConfig::from_toml_str("").unwrap();
        assert_eq!(config.codegen.entry_point, "map");
        assert_eq!(config.codegen.dimension, Dimension::Three);
        assert_eq!(config.codegen.precision, 6);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_partial_codegen_section() {
        let config = FrostConfig::from_toml_str("[codegen]\ndimension = 2\n").unwrap();
        assert_eq!(config.codegen.dimension, Dimension::Two);
        assert_eq!(config.codegen.entry_point, "map");
    }

    #[test]
    fn test_invalid_dimension_rejected() {
        let result = FrostConfig::from_toml_str("[codegen]\ndimension = 4\n");
        assert!(matches!(result, Err(FrostError::Config(_))));
    }

    #[test]
    fn test_empty_entry_point_rejected() {
        let result = FrostConfig::from_toml_str("[codegen]\nentry_point = \"\"\n");
        assert!(result.is_err());
    }
}
