use std::time::Duration;

use anyfunc_core::{
    AnyFuncClient,
    context::{CallContext, CancellationToken},
    error::{AnyFuncError, CancelReason},
    prompt::Prompt,
    provider::{InvokeProvider, InvokeRequest},
};
use anyfunc_gemini::{GeminiAdapter, GeminiAdapterBuilder};
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

const GENERATION: &str = r#"{
  "candidates": [
    {
      "content": {"role": "model", "parts": [{"text": "{\"successful\": false, \"error\": \"cannot compute\"}"}]},
      "finishReason": "STOP",
      "index": 0
    }
  ],
  "usageMetadata": {"promptTokenCount": 90, "candidatesTokenCount": 11, "totalTokenCount": 101},
  "modelVersion": "gemini-2.5-flash"
}"#;

fn adapter(server: &MockServer) -> GeminiAdapter {
    GeminiAdapterBuilder::new()
        .with_api_key("g-test")
        .with_base_url(server.base_url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn posts_generate_content_with_system_instruction() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "g-test")
            .json_body(json!({
                "contents": [{"role": "user", "parts": [{"text": "user text"}]}],
                "systemInstruction": {"parts": [{"text": "system text"}]}
            }));
        then.status(200)
            .header("content-type", "application/json")
            .body(GENERATION);
    });

    let raw = adapter(&server)
        .invoke(&CallContext::new(), InvokeRequest::new("system text", "user text"))
        .await
        .unwrap();

    mock.assert();
    assert!(raw.contains("cannot compute"));
}

#[tokio::test]
async fn declared_failure_surfaces_through_client() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(GENERATION);
    });
    let client = AnyFuncClient::new(adapter(&server));
    let prompt = Prompt::new("Divide a by b")
        .with_parameter("a", 1)
        .with_parameter("b", 0);

    let err = client.call(&CallContext::new(), &prompt).await.unwrap_err();

    match err {
        AnyFuncError::DeclaredFailure { message, .. } => assert_eq!(message, "cannot compute"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_transport_with_provider_text() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(400)
            .header("content-type", "application/json")
            .body(r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#);
    });

    let err = adapter(&server)
        .invoke(&CallContext::new(), InvokeRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn no_candidates_is_transport() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"candidates": []}"#);
    });

    let err = adapter(&server)
        .invoke(&CallContext::new(), InvokeRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn deadline_aborts_in_flight_request() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).body(GENERATION).delay(Duration::from_secs(10));
    });
    let ctx = CallContext::new().with_timeout(Duration::from_millis(100));

    let err = adapter(&server)
        .invoke(&ctx, InvokeRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(matches!(err, AnyFuncError::Cancelled(CancelReason::Timeout(_))));
}

#[tokio::test]
async fn token_aborts_in_flight_request() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).body(GENERATION).delay(Duration::from_secs(10));
    });
    let token = CancellationToken::new();
    let ctx = CallContext::new().with_cancellation(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = adapter(&server)
        .invoke(&ctx, InvokeRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(matches!(err, AnyFuncError::Cancelled(CancelReason::Token)));
}

#[tokio::test]
async fn plain_text_error_body_is_kept_verbatim() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503).body("The service is currently unavailable.");
    });

    let err = adapter(&server)
        .invoke(&CallContext::new(), InvokeRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("The service is currently unavailable."));
}
