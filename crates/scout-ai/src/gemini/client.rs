//! Gemini API client struct, request building, and stream chunk decoding.

use crate::payload::RequestPayload;
use crate::tools::to_gemini_tool;
use crate::{AiError, Fragment, ProviderError, Source, TokenUsage};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    /// Fails with [`AiError::Configuration`] when the key is blank or the
    /// HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::Configuration("Gemini API key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/{}:streamGenerateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, payload: &RequestPayload) -> serde_json::Value {
        let contents: Vec<_> = payload
            .messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "parts": [{ "text": msg.text }]
                })
            })
            .collect();

        let mut generation_config = serde_json::json!({ "responseMimeType": "text/plain" });
        if let Some(temperature) = self.config.temperature {
            generation_config["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max) = self.config.max_output_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max);
        }
        if let Some(budget) = self.config.thinking_budget {
            generation_config["thinkingConfig"] = serde_json::json!({ "thinkingBudget": budget });
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": payload.system_instruction }]
            },
            "generationConfig": generation_config,
        });

        if !payload.tools.is_empty() {
            let tools: Vec<_> = payload.tools.iter().map(to_gemini_tool).collect();
            body["tools"] = serde_json::Value::Array(tools);
        }

        body
    }
}

/// Decode one SSE `data:` payload into a fragment.
///
/// Returns `Ok(None)` for chunks with no text, citations or usage (for
/// example a chunk holding only thought parts).
pub(crate) fn decode_chunk(data: &str) -> Result<Option<Fragment>, ProviderError> {
    let json: serde_json::Value =
        serde_json::from_str(data).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if let Some(error) = json.get("error") {
        return Err(ProviderError::Api {
            status: error["code"].as_u64().and_then(|c| u16::try_from(c).ok()).unwrap_or(500),
            message: error["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let candidate = &json["candidates"][0];

    let mut text = String::new();
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if part["thought"].as_bool() == Some(true) {
                continue;
            }
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
        }
    }

    let sources: Vec<Source> = candidate["groundingMetadata"]["groundingChunks"]
        .as_array()
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.get("web")?;
                    Some(Source {
                        uri: web["uri"].as_str()?.to_string(),
                        title: web["title"].as_str().map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let usage = json.get("usageMetadata").map(|meta| TokenUsage {
        input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0),
    });

    if text.is_empty() && sources.is_empty() && usage.is_none() {
        return Ok(None);
    }

    Ok(Some(Fragment {
        text,
        sources,
        usage,
    }))
}

/// Classify a non-success HTTP response. `body` is `None` when it could
/// not be read; an unreadable or blank body falls back to the status reason.
pub(crate) fn status_error(status: reqwest::StatusCode, body: Option<&str>) -> ProviderError {
    let message = body.map(error_message).filter(|m| !m.is_empty());
    ProviderError::Api {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    }
}

/// Pull the human-readable message out of a Gemini error body, falling
/// back to the raw body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
