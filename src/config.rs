//! Service configuration.
//!
//! Loaded from a YAML (`.yaml`/`.yml`) or JSON file picked by extension.
//! Every key is optional:
//!
//! ```yaml
//! rest:
//!   excluded_models: [AuditLog, Session]
//!   realm: "Provide your credentials."
//! ```
//!
//! `RESTGATE_EXCLUDED_MODELS` (comma-separated) appends to the file's list.

use crate::filter::DEFAULT_REALM;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::debug;

/// Environment variable appended to `rest.excluded_models`.
pub const EXCLUDED_MODELS_ENV: &str = "RESTGATE_EXCLUDED_MODELS";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub rest: RestConfig,
}

/// The `rest` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Resource names never exposed over REST
    pub excluded_models: Vec<String>,
    /// Realm announced in the Basic authentication challenge
    pub realm: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            excluded_models: Vec::new(),
            realm: DEFAULT_REALM.to_string(),
        }
    }
}

impl RestConfig {
    /// Append comma-separated names, ignoring blanks.
    pub fn append_excluded(&mut self, raw: &str) {
        self.excluded_models.extend(
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        );
    }
}

impl ServiceConfig {
    /// Parse a configuration document; `yaml` selects YAML over JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not deserialize.
    pub fn parse(content: &str, yaml: bool) -> Result<Self> {
        if yaml {
            serde_yaml::from_str(content).context("Invalid YAML configuration")
        } else {
            serde_json::from_str(content).context("Invalid JSON configuration")
        }
    }

    /// Apply `RESTGATE_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = env::var(EXCLUDED_MODELS_ENV) {
            debug!(value = %raw, "Appending excluded models from environment");
            self.rest.append_excluded(&raw);
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Load a configuration file and apply environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let mut config = ServiceConfig::parse(&content, is_yaml(path))
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.apply_env();
    debug!(
        path = %path.display(),
        excluded_models = config.rest.excluded_models.len(),
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = ServiceConfig::parse("{}", false).unwrap();
        assert!(config.rest.excluded_models.is_empty());
        assert_eq!(config.rest.realm, "Provide your credentials.");
    }

    #[test]
    fn test_load_yaml() {
        let file = write_config(
            ".yaml",
            "rest:\n  excluded_models:\n    - AuditLog\n    - Session\n",
        );
        let config = load_config(file.path()).unwrap();
        assert!(config.rest.excluded_models.starts_with(&[
            "AuditLog".to_string(),
            "Session".to_string()
        ]));
        assert_eq!(config.rest.realm, DEFAULT_REALM);
    }

    #[test]
    fn test_load_json() {
        let file = write_config(
            ".json",
            r#"{"rest": {"excluded_models": ["Secret"], "realm": "api"}}"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.rest.excluded_models.first().map(String::as_str), Some("Secret"));
        assert_eq!(config.rest.realm, "api");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let file = write_config(".json", "{not json");
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config("/nonexistent/restgate.yaml").is_err());
    }

    #[test]
    fn test_append_excluded_skips_blanks() {
        let mut rest = RestConfig::default();
        rest.append_excluded(" AuditLog, ,Session,");
        assert_eq!(rest.excluded_models, vec!["AuditLog", "Session"]);
    }
}
