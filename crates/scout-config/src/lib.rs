//! Scout configuration system.
//!
//! Provides TOML-based configuration with validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scout_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::ScoutConfig;

use std::path::Path;

use scout_common::ConfigError;

/// Load and validate the config.
///
/// Reads `path` when given, otherwise `config.toml` from the OS config
/// directory (creating a documented default if none exists).
pub fn load_config(path: Option<&Path>) -> Result<ScoutConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ScoutConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ScoutConfig::default());
        assert!(json.contains("\"model\""));
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"google_search\""));
    }

    #[test]
    fn load_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nname = \"\"\n").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn load_config_missing_override_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
        assert!(!path.exists());
    }
}
