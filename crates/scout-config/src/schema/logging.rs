use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber` filter directive scoped to the scout crates.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Debug => "scout_app=debug,scout_ai=debug,scout_config=debug",
            Self::Info => "scout_app=info,scout_ai=info,scout_config=info",
            Self::Warning => "scout_app=warn,scout_ai=warn,scout_config=warn",
            Self::Error => "scout_app=error,scout_ai=error,scout_config=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
