//! AiClient trait implementation for GeminiClient.

use async_trait::async_trait;
use futures_util::{future, StreamExt, TryStreamExt};
use tracing::debug;

use crate::payload::RequestPayload;
use crate::streaming::sse_events;
use crate::{AiClient, FragmentStream, ProviderError};

use super::client::{decode_chunk, status_error, GeminiClient};

#[async_trait]
impl AiClient for GeminiClient {
    async fn stream_generate(
        &self,
        payload: &RequestPayload,
    ) -> Result<FragmentStream, ProviderError> {
        let body = self.build_request_body(payload);
        let url = self.stream_url(&payload.model);

        debug!(
            model = %payload.model,
            messages = payload.messages.len(),
            tools = payload.tools.len(),
            "Gemini API streaming request"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("alt", "sse")])
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "failed to read error body");
                    None
                }
            };
            return Err(status_error(status, body.as_deref()));
        }

        let bytes = response.bytes_stream().map(|chunk| chunk.map_err(read_error));
        let fragments = sse_events(bytes)
            .try_filter_map(|event| future::ready(decode_chunk(&event.data)));

        Ok(fragments.boxed())
    }
}

fn request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// Keep timeouts recognisable after the body stream is adapted to `io`.
fn read_error(e: reqwest::Error) -> std::io::Error {
    if e.is_timeout() {
        std::io::Error::new(std::io::ErrorKind::TimedOut, e)
    } else {
        std::io::Error::other(e)
    }
}
