//! HTTP-level tests for the Gemini adapter against a mock server.

use std::sync::Arc;

use futures_util::StreamExt;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::payload::{ContentRole, PayloadMessage, RequestPayload};
use crate::session::{ConversationSession, SessionSettings};
use crate::tools::GroundingTool;
use crate::{AiClient, AiError, ProviderError, Role};

const MODEL_PATH: &str = "/v1beta/models/gemini-test:streamGenerateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    let config =
        GeminiConfig::new("test-key").with_base_url(format!("{}/v1beta/models", server.uri()));
    GeminiClient::new(config).unwrap()
}

fn payload(text: &str) -> RequestPayload {
    RequestPayload {
        model: "gemini-test".into(),
        system_instruction: "Cite your sources.".into(),
        tools: vec![GroundingTool::GoogleSearch],
        messages: vec![PayloadMessage {
            role: ContentRole::User,
            text: text.into(),
        }],
    }
}

fn sse(chunks: &[&str]) -> ResponseTemplate {
    let body: String = chunks.iter().map(|c| format!("data: {c}\r\n\r\n")).collect();
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

#[tokio::test]
async fn streams_fragments_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(sse(&[
            r#"{"candidates":[{"content":{"parts":[{"text":"Paris"}]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":" is the capital of France."}]}}],"usageMetadata":{"promptTokenCount":9,"candidatesTokenCount":8}}"#,
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client.stream_generate(&payload("Capital of France?")).await.unwrap();
    let fragments: Vec<_> = stream.collect().await;

    let texts: Vec<_> = fragments
        .iter()
        .map(|f| f.as_ref().unwrap().text.as_str())
        .collect();
    assert_eq!(texts, ["Paris", " is the capital of France."]);
    assert_eq!(
        fragments[1].as_ref().unwrap().usage.map(|u| u.total_tokens()),
        Some(17)
    );
}

#[tokio::test]
async fn sends_history_instruction_and_tools() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
            "systemInstruction": { "parts": [{ "text": "Cite your sources." }] },
            "tools": [{ "googleSearch": {} }],
        })))
        .respond_with(sse(&[r#"{"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}"#]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client.stream_generate(&payload("hello")).await.unwrap();
    assert_eq!(stream.count().await, 1);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client_for(&server).stream_generate(&payload("hi")).await;
    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[tokio::test]
async fn http_error_carries_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"error":{"code":404,"message":"models/gemini-test is not found for API version v1beta","status":"NOT_FOUND"}}"#,
        ))
        .mount(&server)
        .await;

    match client_for(&server).stream_generate(&payload("hi")).await {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "models/gemini-test is not found for API version v1beta");
        }
        Err(other) => panic!("expected api error, got {other:?}"),
        Ok(_) => panic!("expected api error, got a stream"),
    }
}

#[tokio::test]
async fn http_error_with_empty_body_reports_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match client_for(&server).stream_generate(&payload("hi")).await {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        Err(other) => panic!("expected api error, got {other:?}"),
        Ok(_) => panic!("expected api error, got a stream"),
    }
}

#[tokio::test]
async fn error_event_mid_stream_surfaces_after_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sse(&[
            r#"{"candidates":[{"content":{"parts":[{"text":"The"}]}}]}"#,
            r#"{"error":{"code":500,"message":"Internal error encountered."}}"#,
        ]))
        .mount(&server)
        .await;

    let fragments: Vec<_> = client_for(&server)
        .stream_generate(&payload("hi"))
        .await
        .unwrap()
        .collect()
        .await;
    assert_eq!(fragments[0].as_ref().unwrap().text, "The");
    assert!(matches!(
        fragments[1],
        Err(ProviderError::Api { status: 500, .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let result = client.stream_generate(&payload("hi")).await;
    assert!(matches!(result, Err(ProviderError::Network(_))));
}

#[tokio::test]
async fn session_over_gemini_commits_grounded_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(sse(&[
            r#"{"candidates":[{"content":{"parts":[{"text":"Paris"}]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":"."}]},"groundingMetadata":{"groundingChunks":[{"web":{"uri":"https://example.org/paris","title":"example.org"}}]}}]}"#,
        ]))
        .mount(&server)
        .await;

    let settings = SessionSettings::new("gemini-test", "Cite your sources.");
    let session = ConversationSession::new(Arc::new(client_for(&server)), settings).unwrap();

    let turn = session
        .run_turn_with("Capital of France?", |_| {})
        .await
        .unwrap();
    assert_eq!(turn.content, "Paris.");
    assert_eq!(turn.sources[0].uri, "https://example.org/paris");

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1], turn);
}

#[tokio::test]
async fn session_surfaces_http_failure_as_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":400,"message":"Tool use with function calling is unsupported"}}"#,
        ))
        .mount(&server)
        .await;

    let settings = SessionSettings::new("gemini-test", "Cite your sources.");
    let session = ConversationSession::new(Arc::new(client_for(&server)), settings).unwrap();

    let result = session.run_turn("hi").await;
    assert!(matches!(
        result,
        Err(AiError::Provider(ProviderError::Api { status: 400, .. }))
    ));
    assert_eq!(session.history().len(), 1);
}
