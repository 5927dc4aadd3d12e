//! Model selection, system instruction and grounding tools.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Concisely answer questions, referring to \
reliable sources. Cite your sources. Rely on high-quality sources and treat lower quality \
sources (such as YouTube) with skepticism.";

/// A retrieval tool the model may use to ground its answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Web search (current API revision).
    GoogleSearch,
    /// Fetch and read URLs mentioned in the prompt.
    UrlContext,
    /// Web search as spelled by the older API revision.
    GoogleSearchRetrieval,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleSearch => "google_search",
            Self::UrlContext => "url_context",
            Self::GoogleSearchRetrieval => "google_search_retrieval",
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier passed to the provider verbatim.
    pub name: String,
    pub system_instruction: String,
    pub tools: Vec<ToolName>,
    /// Sampling temperature (valid range: 0.0-2.0). Provider default when unset.
    pub temperature: Option<f64>,
    /// Output token cap (valid range: 1-65536). Provider default when unset.
    pub max_output_tokens: Option<u32>,
    /// Thinking budget in tokens; -1 lets the model decide, 0 disables thinking.
    pub thinking_budget: Option<i32>,
    /// Only used by `google_search_retrieval` (valid range: 0.0-1.0).
    pub dynamic_threshold: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.into(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.into(),
            tools: vec![ToolName::GoogleSearch, ToolName::UrlContext],
            temperature: None,
            max_output_tokens: None,
            thinking_budget: Some(-1),
            dynamic_threshold: None,
        }
    }
}
