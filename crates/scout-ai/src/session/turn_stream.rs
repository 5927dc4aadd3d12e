//! The lazy fragment stream returned by `run_turn`.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_util::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{AiError, Fragment, FragmentStream, ProviderError, Source, TokenUsage, Turn};

use super::manager::ConversationSession;
use super::types::{BusyGuard, TurnState};

/// Fragments of one assistant response, forwarded in arrival order.
///
/// Exhausting the stream commits the assistant turn. A provider error, or
/// dropping the stream early, discards everything received so far. The
/// session stays busy for as long as this value is alive.
pub struct TurnStream<'a> {
    session: &'a ConversationSession,
    inner: FragmentStream,
    state: TurnState,
    buffer: String,
    sources: Vec<Source>,
    usage: Option<TokenUsage>,
    request_id: String,
    committed: Option<Turn>,
    _guard: BusyGuard<'a>,
}

impl<'a> TurnStream<'a> {
    pub(super) fn new(
        session: &'a ConversationSession,
        guard: BusyGuard<'a>,
        inner: FragmentStream,
        request_id: String,
    ) -> Self {
        Self {
            session,
            inner,
            state: TurnState::AwaitingFirstIncrement,
            buffer: String::new(),
            sources: Vec::new(),
            usage: None,
            request_id,
            committed: None,
            _guard: guard,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Text received so far. Never visible in history unless committed.
    pub fn partial_text(&self) -> &str {
        &self.buffer
    }

    /// The committed assistant turn, once the stream has been exhausted.
    pub fn into_committed(mut self) -> Option<Turn> {
        self.committed.take()
    }

    /// Drain a fresh stream, handing each fragment to `on_fragment`.
    pub(super) async fn drive<F>(mut self, on_fragment: &mut F) -> Result<Turn, AiError>
    where
        F: FnMut(&Fragment),
    {
        while let Some(item) = self.inner.next().await {
            match item {
                Ok(fragment) => {
                    self.accept(&fragment);
                    on_fragment(&fragment);
                }
                Err(e) => {
                    self.fail(&e);
                    return Err(e.into());
                }
            }
        }
        Ok(self.commit())
    }

    fn accept(&mut self, fragment: &Fragment) {
        self.state = TurnState::Streaming;
        self.buffer.push_str(&fragment.text);
        for source in &fragment.sources {
            if !self.sources.iter().any(|s| s.uri == source.uri) {
                self.sources.push(source.clone());
            }
        }
        // Providers report cumulative usage; the last report wins.
        if fragment.usage.is_some() {
            self.usage = fragment.usage;
        }
    }

    fn fail(&mut self, error: &ProviderError) {
        warn!(
            session = %self.session.id,
            request = %self.request_id,
            received_chars = self.buffer.len(),
            error = %error,
            "response stream failed, discarding partial turn"
        );
        self.state = TurnState::Failed;
        self.buffer.clear();
        self.sources.clear();
    }

    fn commit(&mut self) -> Turn {
        if self.state == TurnState::AwaitingFirstIncrement {
            debug!(
                session = %self.session.id,
                request = %self.request_id,
                "provider returned no fragments, committing empty turn"
            );
        }

        let turn = Turn {
            sources: std::mem::take(&mut self.sources),
            ..Turn::assistant(std::mem::take(&mut self.buffer))
        };
        self.session
            .commit_assistant_turn(turn.clone(), self.usage.as_ref());
        self.state = TurnState::Committed;

        info!(
            session = %self.session.id,
            request = %self.request_id,
            chars = turn.content.len(),
            sources = turn.sources.len(),
            "assistant turn committed"
        );

        self.committed = Some(turn.clone());
        turn
    }
}

impl Stream for TurnStream<'_> {
    type Item = Result<Fragment, AiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state.is_terminal() {
            return Poll::Ready(None);
        }

        match ready!(this.inner.poll_next_unpin(cx)) {
            Some(Ok(fragment)) => {
                this.accept(&fragment);
                Poll::Ready(Some(Ok(fragment)))
            }
            Some(Err(e)) => {
                this.fail(&e);
                Poll::Ready(Some(Err(e.into())))
            }
            None => {
                this.commit();
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for TurnStream<'_> {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            info!(
                session = %self.session.id,
                request = %self.request_id,
                discarded_chars = self.buffer.len(),
                "turn cancelled before completion"
            );
        }
    }
}
