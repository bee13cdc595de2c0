//! Gemini backend adapter for **anyfunc**.
//!
//! Sends each call to `POST /v1beta/models/gemini-2.5-flash:generateContent`
//! with the encoded prompt as a single user part and the client's system
//! instruction in the separate `systemInstruction` field.
mod adapter;
mod provider_impl_invoke;

pub use adapter::{API_KEY_ENV, GeminiAdapter, GeminiAdapterBuilder, MODEL};
pub mod api_v1beta;
mod client;
pub mod error;
