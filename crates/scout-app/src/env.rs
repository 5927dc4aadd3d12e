//! Process environment: `.env` loading and API key resolution.

use scout_common::ConfigError;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Load environment variables from a `.env` file in the working directory
/// (KEY=VALUE lines). Variables already set in the environment win.
pub fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };

    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim();
            let key = key.strip_prefix("export ").map(str::trim).unwrap_or(key);
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key, value)
        })
        .collect()
}

/// Resolve the API key through `lookup` (normally `std::env::var`).
pub fn resolve_api_key<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|var| lookup(*var))
        .find(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::MissingCredential(format!(
                "set {} (or {}) in the environment or a .env file",
                API_KEY_VARS[0], API_KEY_VARS[1]
            ))
        })
}
