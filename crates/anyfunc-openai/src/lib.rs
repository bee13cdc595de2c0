//! OpenAI backend adapter for **anyfunc**.
//!
//! Sends each call to `POST /v1/chat/completions` as two messages: the
//! client's system instruction and the encoded prompt. The first choice's
//! text is handed back to the core for contract checking.
mod adapter;
mod provider_impl_invoke;

pub use adapter::{API_KEY_ENV, MODEL, OpenAiAdapter, OpenAiAdapterBuilder};
pub mod api_v1;
mod client;
pub mod error;
