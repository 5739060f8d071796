//! Catalog configuration
//!
//! Three layers merged in order:
//! 1. Built-in defaults
//! 2. Catalog file (`fw-catalog.toml` at the release root, optional)
//! 3. CLI flags

mod defaults;
mod merge;

pub use defaults::BuiltinDefaults;
pub use merge::{merge_into, merge_layers};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Config file looked up at the release root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fw-catalog.toml";

/// Errors that can occur when loading catalog configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Where a serialized catalog is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    /// Output path, relative paths resolve against the release root
    pub path: PathBuf,

    /// Skip this output when its parent directory does not exist
    #[serde(default)]
    pub require_parent: bool,
}

/// Effective catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Checksum manifest file name
    pub manifest_name: String,

    /// Whether artifacts get a git last-commit timestamp
    pub git_history: bool,

    /// Extra exclude globs, relative to the release root
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Output documents
    pub outputs: Vec<OutputTarget>,
}

/// Overrides collected from the command line (layer 3)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub manifest_name: Option<String>,
    pub no_git: bool,
    pub outputs: Vec<PathBuf>,
    pub exclude: Vec<String>,
}

impl CliOverrides {
    /// Only flags that were actually given end up in the layer.
    pub fn to_value(&self) -> Value {
        let mut layer = serde_json::Map::new();
        if let Some(ref name) = self.manifest_name {
            layer.insert("manifest_name".to_string(), Value::from(name.clone()));
        }
        if self.no_git {
            layer.insert("git_history".to_string(), Value::Bool(false));
        }
        if !self.outputs.is_empty() {
            let outputs = self
                .outputs
                .iter()
                .map(|path| {
                    serde_json::json!({
                        "path": path.to_string_lossy(),
                        "require_parent": false,
                    })
                })
                .collect();
            layer.insert("outputs".to_string(), Value::Array(outputs));
        }
        if !self.exclude.is_empty() {
            layer.insert("exclude".to_string(), Value::from(self.exclude.clone()));
        }
        Value::Object(layer)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            manifest_name: defaults.manifest_name,
            git_history: defaults.git_history,
            exclude: defaults.exclude,
            outputs: vec![
                OutputTarget {
                    path: PathBuf::from(defaults.primary_output),
                    require_parent: false,
                },
                OutputTarget {
                    path: PathBuf::from(defaults.web_output),
                    require_parent: true,
                },
            ],
        }
    }
}

impl CatalogConfig {
    /// Resolve the effective config for a release root.
    ///
    /// An explicit `config_file` must exist; the default
    /// `<root>/fw-catalog.toml` is optional.
    pub fn resolve(
        root: &Path,
        config_file: Option<&Path>,
        cli: &CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                layers.push(load_file_layer(path)?);
            }
            None => {
                let path = root.join(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    layers.push(load_file_layer(&path)?);
                }
            }
        }

        layers.push(cli.to_value());
        Self::from_layers(layers)
    }

    /// Merge layers and deserialize the result.
    pub fn from_layers(layers: Vec<Value>) -> Result<Self, ConfigError> {
        let config: CatalogConfig = serde_json::from_value(merge_layers(layers))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file layer on top of the built-in defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let layer: Value = toml::from_str(content)?;
        Self::from_layers(vec![BuiltinDefaults::default().to_value(), layer])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.manifest_name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "manifest_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::InvalidValue {
                field: "manifest_name".to_string(),
                reason: "must be a file name, not a path".to_string(),
            });
        }
        if self.outputs.iter().any(|o| o.path.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "outputs".to_string(),
                reason: "output path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn load_file_layer(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
