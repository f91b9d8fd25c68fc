//! Writer and loader settings, read from YAML.
//!
//! ```yaml
//! writer:
//!   encoding: UTF-8
//!   generator: my-authoring-tool
//! loader:
//!   resolveImports: false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NclError, NclResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub writer: WriterConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriterConfig {
    /// Encoding named in the XML declaration.
    pub encoding: String,
    /// Text of the `Generated with` comment.
    pub generator: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            encoding: "ISO-8859-1".to_string(),
            generator: "ncl-model".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Fetch and load documents named by `importNCL`/`importBase`.
    pub resolve_imports: bool,
    pub max_import_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            resolve_imports: true,
            max_import_depth: 8,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> NclResult<Self> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> NclResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| NclError::ConfigError(format!("read {}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.writer.encoding, "ISO-8859-1");
        assert_eq!(config.writer.generator, "ncl-model");
        assert!(config.loader.resolve_imports);
        assert_eq!(config.loader.max_import_depth, 8);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("writer:\n  encoding: UTF-8\nloader:\n  maxImportDepth: 2\n").unwrap();
        assert_eq!(config.writer.encoding, "UTF-8");
        assert_eq!(config.writer.generator, "ncl-model");
        assert_eq!(config.loader.max_import_depth, 2);
        assert!(config.loader.resolve_imports);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        assert!(matches!(
            Config::from_yaml("writer: [1, 2"),
            Err(NclError::ConfigError(_))
        ));
    }
}
