//! Web-grounding tool declarations.
//!
//! These are provider-side capabilities: the model runs the search itself
//! and we only declare which ones it may use.

/// A retrieval capability attached to every request of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundingTool {
    /// Google Search grounding.
    GoogleSearch,
    /// Let the model fetch URLs that appear in the prompt.
    UrlContext,
    /// Google Search as declared by older model revisions. With a
    /// threshold, the model only searches when its predicted benefit
    /// exceeds it.
    GoogleSearchRetrieval { dynamic_threshold: Option<f64> },
}

impl GroundingTool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleSearch => "google_search",
            Self::UrlContext => "url_context",
            Self::GoogleSearchRetrieval { .. } => "google_search_retrieval",
        }
    }
}

/// The tool set the app uses when nothing else is configured.
pub fn default_grounding_tools() -> Vec<GroundingTool> {
    vec![GroundingTool::GoogleSearch, GroundingTool::UrlContext]
}

/// Convert a tool declaration to the Gemini API format.
pub fn to_gemini_tool(tool: &GroundingTool) -> serde_json::Value {
    match tool {
        GroundingTool::GoogleSearch => serde_json::json!({ "googleSearch": {} }),
        GroundingTool::UrlContext => serde_json::json!({ "urlContext": {} }),
        GroundingTool::GoogleSearchRetrieval { dynamic_threshold } => match dynamic_threshold {
            Some(threshold) => serde_json::json!({
                "googleSearchRetrieval": {
                    "dynamicRetrievalConfig": {
                        "mode": "MODE_DYNAMIC",
                        "dynamicThreshold": threshold,
                    }
                }
            }),
            None => serde_json::json!({ "googleSearchRetrieval": {} }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_and_url_context_are_empty_objects() {
        assert_eq!(
            to_gemini_tool(&GroundingTool::GoogleSearch),
            serde_json::json!({ "googleSearch": {} })
        );
        assert_eq!(
            to_gemini_tool(&GroundingTool::UrlContext),
            serde_json::json!({ "urlContext": {} })
        );
    }

    #[test]
    fn retrieval_threshold_enables_dynamic_mode() {
        let tool = GroundingTool::GoogleSearchRetrieval {
            dynamic_threshold: Some(0.5),
        };
        let json = to_gemini_tool(&tool);
        let config = &json["googleSearchRetrieval"]["dynamicRetrievalConfig"];
        assert_eq!(config["mode"], "MODE_DYNAMIC");
        assert_eq!(config["dynamicThreshold"], 0.5);

        let plain = GroundingTool::GoogleSearchRetrieval {
            dynamic_threshold: None,
        };
        assert_eq!(
            to_gemini_tool(&plain),
            serde_json::json!({ "googleSearchRetrieval": {} })
        );
    }

    #[test]
    fn default_tools_are_search_and_url_context() {
        let names: Vec<_> = default_grounding_tools().iter().map(|t| t.name()).collect();
        assert_eq!(names, ["google_search", "url_context"]);
    }
}
