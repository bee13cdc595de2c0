//! Full pipeline against stub backends: prompt encoding, contract check and
//! decoding, without any network.
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyfunc::{
    AnyFuncClient, AnyFuncError, BackendKind, CallContext, FunctionCaller, Prompt, call_as,
    client::CallFuture,
    context::CancellationToken,
    decode::decode,
    error::CancelReason,
    provider::{InvokeFuture, InvokeProvider, InvokeRequest},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Replies with a fixed text, optionally after a delay, and counts calls.
struct Stub {
    kind: BackendKind,
    reply: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_user_text: Mutex<Option<String>>,
}

impl Stub {
    fn replying(reply: &str) -> Self {
        Self {
            kind: BackendKind::OpenAi,
            reply: reply.to_owned(),
            delay: None,
            calls: AtomicUsize::new(0),
            last_user_text: Mutex::new(None),
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn as_gemini(mut self) -> Self {
        self.kind = BackendKind::Gemini;
        self
    }
}

impl InvokeProvider for Stub {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn model(&self) -> &str {
        "stub"
    }

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_text.lock().unwrap() = Some(request.user_text.to_owned());

        Box::pin(ctx.run(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, AnyFuncError>(self.reply.clone())
        }))
    }
}

fn gcf_prompt() -> Prompt {
    Prompt::new("Return the greatest common factor of num1 and num2")
        .with_parameter("num1", 45)
        .with_parameter("num2", 60)
}

#[tokio::test]
async fn greatest_common_factor_generic_and_typed() {
    let client = AnyFuncClient::new(Stub::replying(r#"{"result": 15, "successful": true}"#));
    let ctx = CallContext::new();

    let generic = client.call(&ctx, &gcf_prompt()).await.unwrap();
    assert_eq!(Value::Object(generic), json!({"result": 15}));

    let typed: i64 = client.call_as(&ctx, &gcf_prompt()).await.unwrap();
    assert_eq!(typed, 15);
}

#[tokio::test]
async fn one_reply_serves_generic_and_typed_views() {
    let client = AnyFuncClient::new(Stub::replying(r#"{"result": 15.0, "successful": true}"#));

    let payload = client.call(&CallContext::new(), &gcf_prompt()).await.unwrap();
    assert_eq!(payload.get("result"), Some(&json!(15.0)));

    let typed: u64 = decode(payload).unwrap();
    assert_eq!(typed, 15);
    assert_eq!(client.backend().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn float_result_decodes_into_integer() {
    let client = AnyFuncClient::new(Stub::replying(r#"{"result": 15.0, "successful": true}"#));
    let typed: u16 = client.call_as(&CallContext::new(), &gcf_prompt()).await.unwrap();
    assert_eq!(typed, 15);
}

#[tokio::test]
async fn declared_failure_carries_model_message() {
    let client = AnyFuncClient::new(Stub::replying(
        r#"{"successful": false, "error": "cannot compute"}"#,
    ));

    let err = client.call(&CallContext::new(), &gcf_prompt()).await.unwrap_err();
    assert!(err.is_declared_failure());
    assert!(matches!(
        err,
        AnyFuncError::DeclaredFailure { ref message, .. } if message == "cannot compute"
    ));

    let err = client
        .call_as::<i64, _>(&CallContext::new(), &gcf_prompt())
        .await
        .unwrap_err();
    assert!(err.is_declared_failure());
}

#[tokio::test]
async fn prose_reply_is_malformed_not_a_panic() {
    let client = AnyFuncClient::new(Stub::replying("Sure! The answer is 15."));

    let err = client.call(&CallContext::new(), &gcf_prompt()).await.unwrap_err();
    match err {
        AnyFuncError::Malformed { raw, .. } => assert_eq!(raw, "Sure! The answer is 15."),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn raw_reply_is_available_unchecked() {
    let client = AnyFuncClient::new(Stub::replying("not json"));
    let raw = client.call_for_json(&CallContext::new(), &gcf_prompt()).await.unwrap();
    assert_eq!(raw, "not json");
}

#[tokio::test]
async fn typed_decode_errors() {
    let ctx = CallContext::new();

    let text = AnyFuncClient::new(Stub::replying(r#"{"result": "abc", "successful": true}"#));
    let err = text.call_as::<i64, _>(&ctx, &gcf_prompt()).await.unwrap_err();
    assert!(matches!(err, AnyFuncError::TypeMismatch { field: "result", .. }));

    let unnamed = AnyFuncClient::new(Stub::replying(r#"{"gcf": 15, "successful": true}"#));
    let err = unnamed.call_as::<i64, _>(&ctx, &gcf_prompt()).await.unwrap_err();
    assert!(matches!(err, AnyFuncError::MissingField { field: "result", .. }));
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct Division {
    quotient: i64,
    remainder: i64,
}

#[tokio::test]
async fn structured_result_uses_named_fields() {
    let client = AnyFuncClient::new(
        Stub::replying(r#"{"quotient": 3, "remainder": 2, "successful": true}"#).as_gemini(),
    );
    let prompt = Prompt::new("Divide a by b, return quotient and remainder")
        .with_parameter("a", 17)
        .with_parameter("b", 5);

    let division: Division = client.call_as(&CallContext::new(), &prompt).await.unwrap();
    assert_eq!(
        division,
        Division {
            quotient: 3,
            remainder: 2
        }
    );
    assert_eq!(client.kind(), BackendKind::Gemini);
}

#[tokio::test]
async fn structured_mismatch_is_schema_error() {
    let client = AnyFuncClient::new(Stub::replying(r#"{"quotient": 3, "successful": true}"#));
    let err = client
        .call_as::<Division, _>(&CallContext::new(), &gcf_prompt())
        .await
        .unwrap_err();
    assert!(matches!(err, AnyFuncError::SchemaMismatch { .. }));
}

#[tokio::test]
async fn same_prompt_encodes_identically_for_every_backend() {
    let openai = AnyFuncClient::new(Stub::replying(r#"{"result": 1}"#));
    let gemini = AnyFuncClient::new(Stub::replying(r#"{"result": 1}"#).as_gemini());
    let ctx = CallContext::new();

    openai.call(&ctx, &gcf_prompt()).await.unwrap();
    gemini.call(&ctx, &gcf_prompt()).await.unwrap();

    let sent_openai = openai.backend().last_user_text.lock().unwrap().clone();
    let sent_gemini = gemini.backend().last_user_text.lock().unwrap().clone();
    assert_eq!(sent_openai, sent_gemini);
    assert_eq!(sent_openai.as_deref(), Some(openai.encode(&gcf_prompt()).unwrap().as_str()));
}

#[tokio::test]
async fn timeout_is_cancelled_not_transport() {
    let client =
        AnyFuncClient::new(Stub::replying(r#"{"result": 1}"#).slow(Duration::from_secs(10)));
    let ctx = CallContext::new().with_timeout(Duration::from_millis(20));

    let err = client.call(&ctx, &gcf_prompt()).await.unwrap_err();
    assert!(matches!(err, AnyFuncError::Cancelled(CancelReason::Timeout(_))));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn cancelled_token_stops_call() {
    let client =
        AnyFuncClient::new(Stub::replying(r#"{"result": 1}"#).slow(Duration::from_secs(10)));
    let token = CancellationToken::new();
    let ctx = CallContext::new().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let err = client.call(&ctx, &gcf_prompt()).await.unwrap_err();
    canceller.await.unwrap();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let client = AnyFuncClient::new(
        Stub::replying(r#"{"result": 15, "successful": true}"#).slow(Duration::from_millis(5)),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .call_as::<i64, _>(&CallContext::new(), &gcf_prompt())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 15);
    }
    assert_eq!(client.backend().calls.load(Ordering::SeqCst), 8);
}

/// Stands in for a whole client, as code consuming `FunctionCaller` would.
struct Recorded(Arc<str>);

impl FunctionCaller for Recorded {
    fn call_for_json<'a, P>(
        &'a self,
        _ctx: &'a CallContext,
        _prompt: &'a Prompt<P>,
    ) -> CallFuture<'a, String>
    where
        P: serde::Serialize + Sync,
    {
        let reply = self.0.to_string();
        Box::pin(async move { Ok::<_, AnyFuncError>(reply) })
    }
}

#[tokio::test]
async fn typed_call_over_any_function_caller() {
    let caller = Recorded(Arc::from(r#"{"result": "HELLO", "successful": true}"#));
    let prompt = Prompt::new("Uppercase `text`").with_parameter("text", "hello");

    let shouted: String = call_as(&caller, &CallContext::new(), &prompt).await.unwrap();
    assert_eq!(shouted, "HELLO");

    let payload = caller.call(&CallContext::new(), &prompt).await.unwrap();
    assert_eq!(payload.get("result"), Some(&json!("HELLO")));
}
