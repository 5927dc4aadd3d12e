//! Server-Sent Events (SSE) decoding.
//!
//! Gemini streams `streamGenerateContent?alt=sse` responses as SSE. The
//! decoder here turns any byte stream into a lazy stream of events, so
//! each event reaches the caller as soon as its terminating blank line
//! arrives.

use std::io;

use bytes::Buf;
use futures_util::{stream, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::io::StreamReader;

use crate::ProviderError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, when the server sent one.
    pub event: Option<String>,
    /// The `data:` lines joined with `\n`.
    pub data: String,
}

/// Decode an SSE byte stream into events.
///
/// Read errors of kind `TimedOut` surface as [`ProviderError::Timeout`],
/// all others as [`ProviderError::Network`]. The stream ends after the
/// first error.
pub fn sse_events<S, B>(byte_stream: S) -> impl Stream<Item = Result<SseEvent, ProviderError>> + Send
where
    S: Stream<Item = io::Result<B>> + Send + 'static,
    B: Buf + Send + 'static,
{
    let reader = BufReader::new(StreamReader::new(Box::pin(byte_stream)));
    let decoder = SseDecoder {
        lines: reader.lines(),
        event: None,
        data: String::new(),
        done: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        let item = decoder.next_event().await?;
        Some((item, decoder))
    })
}

struct SseDecoder<R> {
    lines: Lines<R>,
    event: Option<String>,
    data: String,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> SseDecoder<R> {
    async fn next_event(&mut self) -> Option<Result<SseEvent, ProviderError>> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return self.flush().map(Ok);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(read_error(e)));
                }
            };

            if line.is_empty() {
                // Blank line ends the event.
                if let Some(event) = self.flush() {
                    return Some(Ok(event));
                }
                continue;
            }

            if let Some(event_type) = field_value(&line, "event") {
                self.event = Some(event_type.to_string());
            } else if let Some(data) = field_value(&line, "data") {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(data);
            }
            // id:, retry: and `:` comments are ignored
        }
    }

    fn flush(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.data),
        })
    }
}

/// `name: value` or `name:value`.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn read_error(e: io::Error) -> ProviderError {
    if e.kind() == io::ErrorKind::TimedOut {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    async fn decode(chunks: Vec<&'static str>) -> Vec<Result<SseEvent, ProviderError>> {
        let bytes = stream::iter(chunks.into_iter().map(|c| Ok::<_, io::Error>(c.as_bytes())));
        sse_events(bytes).collect().await
    }

    fn data(event: &Result<SseEvent, ProviderError>) -> &str {
        &event.as_ref().unwrap().data
    }

    #[tokio::test]
    async fn events_split_on_blank_lines() {
        let events = decode(vec!["data: {\"a\":1}\n\ndata: {\"b\":2}\n\n"]).await;
        assert_eq!(events.len(), 2);
        assert_eq!(data(&events[0]), "{\"a\":1}");
        assert_eq!(data(&events[1]), "{\"b\":2}");
    }

    #[tokio::test]
    async fn event_split_across_chunks() {
        let events = decode(vec!["da", "ta: hel", "lo\n", "\n"]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(data(&events[0]), "hello");
    }

    #[tokio::test]
    async fn multi_line_data_joined_and_event_type_kept() {
        let events = decode(vec!["event: chunk\ndata: one\ndata:two\n\n"]).await;
        let event = events[0].as_ref().unwrap();
        assert_eq!(event.event.as_deref(), Some("chunk"));
        assert_eq!(event.data, "one\ntwo");
    }

    #[tokio::test]
    async fn crlf_and_comments_handled() {
        let events = decode(vec![": keep-alive\r\n\r\ndata: x\r\nid: 7\r\n\r\n"]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(data(&events[0]), "x");
    }

    #[tokio::test]
    async fn trailing_event_flushed_at_eof() {
        let events = decode(vec!["data: first\n\ndata: last"]).await;
        assert_eq!(events.len(), 2);
        assert_eq!(data(&events[1]), "last");
    }

    #[tokio::test]
    async fn read_error_ends_stream() {
        let chunks: Vec<io::Result<&'static [u8]>> = vec![
            Ok(&b"data: ok\n\n"[..]),
            Err(io::Error::new(io::ErrorKind::TimedOut, "read timeout")),
            Ok(&b"data: never\n\n"[..]),
        ];
        let events: Vec<_> = sse_events(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(data(&events[0]), "ok");
        assert!(matches!(events[1], Err(ProviderError::Timeout)));
    }
}
