//! Provider-neutral request built from conversation history.

use crate::tools::GroundingTool;
use crate::{Role, Turn};

/// Role names in the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRole {
    User,
    Model,
}

impl ContentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl From<Role> for ContentRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Assistant => Self::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMessage {
    pub role: ContentRole,
    pub text: String,
}

impl From<&Turn> for PayloadMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            text: turn.content.clone(),
        }
    }
}

/// Everything a provider needs for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub model: String,
    pub system_instruction: String,
    pub tools: Vec<GroundingTool>,
    /// Oldest first.
    pub messages: Vec<PayloadMessage>,
}
