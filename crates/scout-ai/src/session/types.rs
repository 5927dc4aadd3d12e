//! Session settings, turn states and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::tools::{default_grounding_tools, GroundingTool};
use crate::AiError;

/// Constants fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub model: String,
    pub system_instruction: String,
    pub tools: Vec<GroundingTool>,
}

impl SessionSettings {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            tools: default_grounding_tools(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<GroundingTool>) -> Self {
        self.tools = tools;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AiError> {
        if self.model.trim().is_empty() {
            return Err(AiError::Configuration("model identifier is empty".into()));
        }
        if self.system_instruction.trim().is_empty() {
            return Err(AiError::Configuration("system instruction is empty".into()));
        }
        Ok(())
    }
}

/// Progress of a single `run_turn` call.
///
/// A session with no live `TurnStream` is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Stream opened, nothing received yet.
    AwaitingFirstIncrement,
    /// At least one fragment received.
    Streaming,
    /// Assistant turn appended to history.
    Committed,
    /// Provider error or cancellation; partial text discarded.
    Failed,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Failed)
    }
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the stream is abandoned or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `Err` if already busy.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::SessionBusy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
