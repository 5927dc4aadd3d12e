//! Turns the loaded config and credential into a ready session.

use std::sync::Arc;
use std::time::Duration;

use scout_ai::{
    AiError, ConversationSession, GeminiClient, GeminiConfig, GroundingTool, SessionSettings,
};
use scout_common::ScoutError;
use scout_config::schema::{ModelConfig, ToolName};
use scout_config::ScoutConfig;

pub fn build_session(
    config: &ScoutConfig,
    api_key: String,
) -> Result<ConversationSession, ScoutError> {
    let client = GeminiClient::new(gemini_config(config, api_key)).map_err(ai_error)?;
    ConversationSession::new(Arc::new(client), session_settings(&config.model)).map_err(ai_error)
}

pub fn gemini_config(config: &ScoutConfig, api_key: String) -> GeminiConfig {
    let mut gemini = GeminiConfig::new(api_key)
        .with_base_url(&config.api.base_url)
        .with_timeouts(
            Duration::from_secs(config.api.connect_timeout_secs.into()),
            Duration::from_secs(config.api.request_timeout_secs.into()),
        );
    gemini.temperature = config.model.temperature;
    gemini.max_output_tokens = config.model.max_output_tokens;
    gemini.thinking_budget = config.model.thinking_budget;
    gemini
}

pub fn session_settings(model: &ModelConfig) -> SessionSettings {
    let tools = model
        .tools
        .iter()
        .map(|tool| grounding_tool(*tool, model.dynamic_threshold))
        .collect();
    SessionSettings::new(&model.name, &model.system_instruction).with_tools(tools)
}

fn grounding_tool(tool: ToolName, dynamic_threshold: Option<f64>) -> GroundingTool {
    match tool {
        ToolName::GoogleSearch => GroundingTool::GoogleSearch,
        ToolName::UrlContext => GroundingTool::UrlContext,
        ToolName::GoogleSearchRetrieval => {
            GroundingTool::GoogleSearchRetrieval { dynamic_threshold }
        }
    }
}

pub fn ai_error(e: AiError) -> ScoutError {
    ScoutError::Ai(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_search_session() {
        let session = build_session(&ScoutConfig::default(), "test-key".into()).unwrap();
        let settings = session.settings();
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert!(settings.system_instruction.starts_with("Concisely answer questions"));
        assert_eq!(
            settings.tools,
            vec![GroundingTool::GoogleSearch, GroundingTool::UrlContext]
        );
    }

    #[test]
    fn retrieval_tool_gets_threshold() {
        let mut config = ScoutConfig::default();
        config.model.tools = vec![ToolName::GoogleSearchRetrieval];
        config.model.dynamic_threshold = Some(0.7);

        let settings = session_settings(&config.model);
        assert_eq!(
            settings.tools,
            vec![GroundingTool::GoogleSearchRetrieval {
                dynamic_threshold: Some(0.7)
            }]
        );
    }

    #[test]
    fn generation_settings_carried_over() {
        let mut config = ScoutConfig::default();
        config.model.temperature = Some(0.2);
        config.model.max_output_tokens = Some(2048);
        config.api.request_timeout_secs = 30;

        let gemini = gemini_config(&config, "k".into());
        assert_eq!(gemini.temperature, Some(0.2));
        assert_eq!(gemini.max_output_tokens, Some(2048));
        assert_eq!(gemini.thinking_budget, Some(-1));
        assert_eq!(gemini.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_model_is_reported_as_ai_error() {
        let mut config = ScoutConfig::default();
        config.model.name = String::new();

        let err = build_session(&config, "k".into()).err().unwrap();
        assert!(matches!(err, ScoutError::Ai(_)));
        assert!(err.to_string().contains("model identifier is empty"));
    }
}
