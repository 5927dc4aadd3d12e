//! Turn execution: open the provider stream, or drive it to completion.

use scout_common::new_correlation_id;
use tracing::{debug, warn};

use crate::{AiError, Fragment, Turn};

use super::manager::ConversationSession;
use super::turn_stream::TurnStream;
use super::types::BusyGuard;

impl ConversationSession {
    /// Append `user_text` as a user turn and open a streaming call over
    /// the whole history.
    ///
    /// The assistant turn is committed when the returned stream is
    /// exhausted. If the call fails before the stream opens, the user turn
    /// stays in history and the error is returned here.
    pub async fn run_turn(&self, user_text: impl Into<String>) -> Result<TurnStream<'_>, AiError> {
        let guard = BusyGuard::acquire(&self.busy)?;
        self.push_user_turn(user_text.into())?;

        let payload = self.build_request();
        let request_id = new_correlation_id();
        debug!(
            session = %self.id,
            request = %request_id,
            model = %payload.model,
            messages = payload.messages.len(),
            "opening response stream"
        );

        let inner = match self.client.stream_generate(&payload).await {
            Ok(inner) => inner,
            Err(e) => {
                warn!(
                    session = %self.id,
                    request = %request_id,
                    error = %e,
                    "provider call failed before first fragment"
                );
                return Err(e.into());
            }
        };

        Ok(TurnStream::new(self, guard, inner, request_id))
    }

    /// Run a turn to completion, handing each fragment to `on_fragment` as
    /// it arrives, and return the committed assistant turn.
    pub async fn run_turn_with<F>(
        &self,
        user_text: impl Into<String>,
        mut on_fragment: F,
    ) -> Result<Turn, AiError>
    where
        F: FnMut(&Fragment),
    {
        let stream = self.run_turn(user_text).await?;
        stream.drive(&mut on_fragment).await
    }
}
