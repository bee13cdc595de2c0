//! Generic, lightweight client that runs a [`Prompt`] against a single
//! concrete backend adapter.
//!
//! The client is **generic over the adapter type `B`**. Pick the adapter at
//! compile time (`AnyFuncClient<OpenAiAdapter>`) or at run time
//! (`AnyFuncClient<Box<dyn InvokeProvider>>`); either way the binding is fixed
//! for the client's whole lifetime.
//!
//! Pipeline of one call:
//!
//! ```text
//! Prompt ──encode──► user text ──InvokeProvider::invoke──► raw reply
//!        ──envelope::parse──► payload ──decode::<T>──► T
//! ```
//!
//! ```rust,no_run
//! # use anyfunc_core::{AnyFuncClient, context::CallContext, prompt::Prompt, provider::InvokeProvider};
//! # async fn demo<B: InvokeProvider>(backend: B) -> anyfunc_core::error::Result<()> {
//! let client = AnyFuncClient::new(backend);
//! let prompt = Prompt::new("Return the greatest common factor of num1 and num2")
//!     .with_parameter("num1", 45)
//!     .with_parameter("num2", 60);
//!
//! let gcf: u32 = client.call_as(&CallContext::new(), &prompt).await?;
//! # Ok(()) }
//! ```
use std::{fmt, future::Future, pin::Pin, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    backend::BackendKind,
    context::CallContext,
    decode::decode,
    envelope::{self, Envelope},
    error::Result,
    prompt::Prompt,
    provider::{InvokeProvider, InvokeRequest},
};

/// Instruction sent with every call unless overridden with
/// [`AnyFuncClient::with_system_instruction`].
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are an AI assistant that completes math calculation and text \
transformation tasks. You receive a description of a task followed by its \
parameters in JSON format.
Produce a response that fulfils the task using the given parameters. Respond \
with JSON only, without Markdown formatting. The JSON must contain the result \
of the task and a field named \"successful\" set to the boolean true. If the \
result has no obvious name, put it in a field named exactly \"result\".
If you cannot complete the task, respond with JSON that sets \"successful\" to \
false and puts a short explanation in a field named \"error\".";

/// Boxed future returned by [`FunctionCaller`] methods.
pub type CallFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The operations a caller needs from a client.
///
/// Only [`FunctionCaller::call_for_json`] is required; the generic call is
/// derived from it. This makes it trivial to stand in a canned implementation
/// in tests of code that consumes a client.
pub trait FunctionCaller: Send + Sync {
    /// Run `prompt` and return the backend's raw reply text.
    fn call_for_json<'a, P>(
        &'a self,
        ctx: &'a CallContext,
        prompt: &'a Prompt<P>,
    ) -> CallFuture<'a, String>
    where
        P: Serialize + Sync;

    /// Run `prompt` and return the success payload as an open mapping.
    fn call<'a, P>(
        &'a self,
        ctx: &'a CallContext,
        prompt: &'a Prompt<P>,
    ) -> CallFuture<'a, Map<String, Value>>
    where
        P: Serialize + Sync,
    {
        Box::pin(async move {
            let raw = self.call_for_json(ctx, prompt).await?;
            envelope::parse(&raw).map(Envelope::into_payload)
        })
    }
}

/// Run `prompt` through any [`FunctionCaller`] and decode the payload into `T`.
pub async fn call_as<T, C, P>(caller: &C, ctx: &CallContext, prompt: &Prompt<P>) -> Result<T>
where
    T: DeserializeOwned,
    C: FunctionCaller,
    P: Serialize + Sync,
{
    let payload = caller.call(ctx, prompt).await?;
    decode(payload)
}

/// A client bound to a single backend adapter.
///
/// Clone the client if you need to share it across tasks; the adapter sits
/// behind an `Arc`, so that is cheap. The adapter is responsible for the
/// thread safety of its connection handle.
pub struct AnyFuncClient<B> {
    backend: Arc<B>,
    system_instruction: Arc<str>,
}

impl<B> Clone for AnyFuncClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            system_instruction: Arc::clone(&self.system_instruction),
        }
    }
}

impl<B: InvokeProvider> fmt::Debug for AnyFuncClient<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyFuncClient")
            .field("backend", &self.backend.kind())
            .field("model", &self.backend.model())
            .field("system_instruction", &self.system_instruction)
            .finish()
    }
}

impl<B> AnyFuncClient<B>
where
    B: InvokeProvider,
{
    /// Create a client that delegates all calls to `backend`, using
    /// [`DEFAULT_SYSTEM_INSTRUCTION`].
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            system_instruction: Arc::from(DEFAULT_SYSTEM_INSTRUCTION),
        }
    }

    /// Replace the system instruction sent with every call.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Arc::from(instruction.into());
        self
    }

    /// Access the underlying adapter.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Render the user text for `prompt` exactly as it would be sent.
    pub fn encode<P: Serialize>(&self, prompt: &Prompt<P>) -> Result<String> {
        prompt.encode()
    }

    /// Run `prompt` and return the raw reply without checking the contract.
    pub async fn call_for_json<P: Serialize>(
        &self,
        ctx: &CallContext,
        prompt: &Prompt<P>,
    ) -> Result<String> {
        let user_text = self.encode(prompt)?;
        tracing::debug!(backend = %self.kind(), prompt = %user_text, "encoded prompt");

        let request = InvokeRequest::new(&self.system_instruction, &user_text);
        let raw = self.backend.invoke(ctx, request).await?;

        tracing::debug!(backend = %self.kind(), response = %raw, "raw response");
        Ok(raw)
    }

    /// Run `prompt` and return the checked envelope, including the advisory
    /// `"successful"` flag.
    pub async fn call_envelope<P: Serialize>(
        &self,
        ctx: &CallContext,
        prompt: &Prompt<P>,
    ) -> Result<Envelope> {
        let raw = self.call_for_json(ctx, prompt).await?;
        envelope::parse(&raw)
    }

    /// Run `prompt` and return the success payload as an open mapping.
    pub async fn call<P: Serialize>(
        &self,
        ctx: &CallContext,
        prompt: &Prompt<P>,
    ) -> Result<Map<String, Value>> {
        self.call_envelope(ctx, prompt).await.map(Envelope::into_payload)
    }

    /// Run `prompt` and decode the payload into `T`.
    ///
    /// Scalars are read from the `"result"` field, anything structured from
    /// the whole payload; see [`crate::decode`].
    pub async fn call_as<T, P>(&self, ctx: &CallContext, prompt: &Prompt<P>) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let payload = self.call(ctx, prompt).await?;
        decode(payload)
    }
}

impl<B: InvokeProvider> FunctionCaller for AnyFuncClient<B> {
    fn call_for_json<'a, P>(
        &'a self,
        ctx: &'a CallContext,
        prompt: &'a Prompt<P>,
    ) -> CallFuture<'a, String>
    where
        P: Serialize + Sync,
    {
        Box::pin(AnyFuncClient::call_for_json(self, ctx, prompt))
    }
}
