//! Project-local configuration (`.cirneco/config.json`)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::Error;

/// Directory under the project root holding configuration and output
pub const PROJECT_DIR: &str = ".cirneco";

/// Configuration file name inside [`PROJECT_DIR`]
pub const CONFIG_FILE: &str = "config.json";

/// Settings read from the project configuration file
///
/// `custom_themes` is kept as raw JSON so each entry can be validated on its
/// own when the catalog is built; one broken theme does not discard the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub default_theme: Option<String>,
    #[serde(default)]
    pub custom_themes: BTreeMap<String, serde_json::Value>,
}

impl ProjectConfig {
    /// Path of the configuration file for a project root.
    pub fn path_for(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join(CONFIG_FILE)
    }

    /// Load the configuration for `project_root`.
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// malformed one is logged and also yields the default.
    pub fn load(project_root: &Path) -> Self {
        let path = Self::path_for(project_root);
        if !path.exists() {
            debug!("No project configuration at {}", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Read and parse a configuration file, reporting failures.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let failure = |reason: String| Error::ConfigLoadFailure { path: path.to_path_buf(), reason };
        let text = std::fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| failure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(root: &Path, body: &str) {
        let dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), body).unwrap();
    }

    #[test]
    fn missing_config_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(ProjectConfig::load(tmp.path()), ProjectConfig::default());
    }

    #[test]
    fn malformed_config_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), "{ not json");
        assert_eq!(ProjectConfig::load(tmp.path()), ProjectConfig::default());
        assert!(matches!(
            ProjectConfig::load_from(&ProjectConfig::path_for(tmp.path())),
            Err(Error::ConfigLoadFailure { .. })
        ));
    }

    #[test]
    fn reads_default_theme_and_custom_entries() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), r#"{ "defaultTheme": "nord", "customThemes": { "mine": { "name": "Mine" } } }"#);
        let config = ProjectConfig::load(tmp.path());
        assert_eq!(config.default_theme.as_deref(), Some("nord"));
        assert!(config.custom_themes.contains_key("mine"));
    }
}
