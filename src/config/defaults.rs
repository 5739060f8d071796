//! Built-in catalog defaults (layer 1)

use serde::{Deserialize, Serialize};

use crate::checksum::DEFAULT_MANIFEST_NAME;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Checksum manifest file name to look for (default: "SHA256SUMS.txt")
    pub manifest_name: String,

    /// Look up last-commit times with git (default: true)
    pub git_history: bool,

    /// Extra exclude globs for discovery (default: none)
    pub exclude: Vec<String>,

    /// Primary output, always written (default: "manifest.json")
    pub primary_output: String,

    /// Mirror output, written only when its directory exists
    /// (default: "web/manifest.json")
    pub web_output: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            git_history: true,
            exclude: Vec::new(),
            primary_output: "manifest.json".to_string(),
            web_output: "web/manifest.json".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "manifest_name": self.manifest_name,
            "git_history": self.git_history,
            "exclude": self.exclude,
            "outputs": [
                { "path": self.primary_output, "require_parent": false },
                { "path": self.web_output, "require_parent": true }
            ]
        })
    }
}
