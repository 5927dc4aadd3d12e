//! Conversation session management.
//!
//! A `ConversationSession` owns the ordered turn history, rebuilds the
//! provider request from it on every call, and commits an assistant turn
//! only once its streamed response has completed.

mod chat;
mod manager;
mod turn_stream;
mod types;


pub use manager::ConversationSession;
pub use turn_stream::TurnStream;
pub use types::{SessionSettings, TurnState};
