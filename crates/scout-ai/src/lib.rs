//! AI engine for Scout.
//!
//! Provides:
//! - `ConversationSession`: ordered turn history, request building, and
//!   commit-on-completion streaming
//! - the `AiClient` contract every provider adapter implements
//! - a Gemini adapter with web-grounding tools and SSE streaming
//! - token usage tracking

pub mod gemini;
pub mod payload;
pub mod session;
pub mod streaming;
pub mod token_tracker;
pub mod tools;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use payload::{ContentRole, PayloadMessage, RequestPayload};
pub use session::{ConversationSession, SessionSettings, TurnState, TurnStream};
pub use token_tracker::TokenTracker;
pub use tools::GroundingTool;

/// Fragments of one streamed response, in generation order.
pub type FragmentStream = BoxStream<'static, Result<Fragment, ProviderError>>;

/// A remote model that can stream a response to a request.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Open a streaming generation call. The returned stream is finite and
    /// cannot be restarted; it may fail before or between fragments.
    async fn stream_generate(&self, payload: &RequestPayload)
        -> Result<FragmentStream, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged utterance in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Web sources the grounding tool cited while producing this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: Vec::new(),
        }
    }
}

/// A web page cited by the grounding tool.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: Option<String>,
}

/// One incremental unit of a streamed response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// May be empty when the chunk only carried metadata.
    pub text: String,
    pub sources: Vec<Source>,
    pub usage: Option<TokenUsage>,
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Failures reported by, or while talking to, the remote model.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("rate limited")]
    RateLimited,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("session is busy with another request")]
    SessionBusy,
}
