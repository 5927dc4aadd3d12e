//! Configuration schema types for Scout.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the app ships with.

mod api;
mod logging;
mod model;

pub use api::*;
pub use logging::*;
pub use model::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Scout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub model: ModelConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}
