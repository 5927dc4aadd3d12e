//! Session struct, history ownership and request building.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use scout_common::SessionId;
use tracing::debug;

use crate::payload::{PayloadMessage, RequestPayload};
use crate::token_tracker::TokenTracker;
use crate::{AiClient, AiError, TokenUsage, Turn};

use super::types::{BusyGuard, SessionSettings};

/// One conversation with a remote model.
pub struct ConversationSession {
    pub(super) id: SessionId,
    pub(super) client: Arc<dyn AiClient>,
    pub(super) settings: SessionSettings,
    /// Append-only, in conversational order.
    pub(super) history: RwLock<Vec<Turn>>,
    pub(super) tracker: Mutex<TokenTracker>,
    /// Set while a turn is in flight.
    pub(super) busy: AtomicBool,
}

impl ConversationSession {
    /// Fails with [`AiError::Configuration`] when the model identifier or
    /// system instruction is blank.
    pub fn new(client: Arc<dyn AiClient>, settings: SessionSettings) -> Result<Self, AiError> {
        settings.validate()?;

        let id = SessionId::new();
        debug!(session = %id, model = %settings.model, "session created");

        Ok(Self {
            id,
            client,
            settings,
            history: RwLock::new(Vec::new()),
            tracker: Mutex::new(TokenTracker::new()),
            busy: AtomicBool::new(false),
        })
    }

    /// Append a user turn without contacting the provider.
    pub fn submit_user_turn(&self, text: impl Into<String>) -> Result<(), AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.push_user_turn(text.into())
    }

    /// Build the provider request for the current history.
    pub fn build_request(&self) -> RequestPayload {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        RequestPayload {
            model: self.settings.model.clone(),
            system_instruction: self.settings.system_instruction.clone(),
            tools: self.settings.tools.clone(),
            messages: history.iter().map(PayloadMessage::from).collect(),
        }
    }

    /// Snapshot of the conversation so far, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn turn_count(&self) -> usize {
        self.history.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Snapshot of token usage across committed turns.
    pub fn tracker(&self) -> TokenTracker {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Whether a turn is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Caller must hold the busy guard.
    pub(super) fn push_user_turn(&self, text: String) -> Result<(), AiError> {
        if text.trim().is_empty() {
            return Err(AiError::Validation("message must not be empty".into()));
        }

        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Turn::user(text));
        Ok(())
    }

    /// Caller must hold the busy guard.
    pub(super) fn commit_assistant_turn(&self, turn: Turn, usage: Option<&TokenUsage>) {
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(turn);
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(&self.settings.model, usage);
    }
}
