use std::{future::Future, pin::Pin, sync::Arc};

use crate::{backend::BackendKind, context::CallContext, error::Result};

/// Boxed future returned by [`InvokeProvider::invoke`].
pub type InvokeFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// A **backend adapter** turns an encoded prompt into a network call to a
/// concrete provider (OpenAI, Gemini, …) and extracts the raw reply text.
///
/// The trait is intentionally minimal:
///
/// * **One identity** – the [`BackendKind`] this adapter implements.
/// * **One async-ish method** – `invoke`, a *single* non-streaming round trip
///   that returns the first generated text candidate.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so the trait stays
/// object-safe without pulling in `async_trait`; the umbrella crate stores
/// adapters as `Box<dyn InvokeProvider>`.
///
/// Implementations must:
///
/// * run the HTTP round trip inside [`CallContext::run`] so cancellation and
///   deadlines abort the request,
/// * report provider failures (auth, rate limit, connectivity, no candidate)
///   as [`AnyFuncError::Transport`](crate::error::AnyFuncError::Transport)
///   carrying the provider's original text,
/// * be safe to call concurrently from many tasks (`Send + Sync`).
pub trait InvokeProvider: Send + Sync {
    /// The backend this adapter talks to.
    fn kind(&self) -> BackendKind;

    /// Provider model identifier, fixed per adapter.
    fn model(&self) -> &str;

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a>;
}

/// Everything an adapter needs for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeRequest<'a> {
    /// Fixed per client; sent as a system message or system-instruction field.
    pub system_instruction: &'a str,
    /// The encoded prompt.
    pub user_text: &'a str,
}

impl<'a> InvokeRequest<'a> {
    pub fn new(system_instruction: &'a str, user_text: &'a str) -> Self {
        Self {
            system_instruction,
            user_text,
        }
    }
}

impl<T: InvokeProvider + ?Sized> InvokeProvider for Box<T> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a> {
        (**self).invoke(ctx, request)
    }
}

impl<T: InvokeProvider + ?Sized> InvokeProvider for Arc<T> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn invoke<'a>(&'a self, ctx: &'a CallContext, request: InvokeRequest<'a>) -> InvokeFuture<'a> {
        (**self).invoke(ctx, request)
    }
}
