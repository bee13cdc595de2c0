//! # `anyfunc` – The umbrella crate
//!
//! Describe a task in plain language, hand over its parameters, and let an
//! LLM compute the answer. The reply is checked against a small JSON contract
//! and decoded into whatever type you ask for.
//!
//! | Crate                  | What it provides                                                    |
//! |------------------------|---------------------------------------------------------------------|
//! | **`anyfunc-core`**     | `Prompt`, `AnyFuncClient`, reply contract, typed decoding, errors   |
//! | **`anyfunc-openai`**   | Chat-completions adapter (`gpt-5`) *(feature `openai`)*             |
//! | **`anyfunc-gemini`**   | generateContent adapter (`gemini-2.5-flash`) *(feature `gemini`)*   |
//!
//! Both adapters are enabled by default. Disabling a feature drops its HTTP
//! stack; [`connect`] then rejects that backend at construction time.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use anyfunc::{BackendKind, CallContext, Credentials, Prompt, connect_with_credentials};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::load("api_key.yaml")?;
//!     let client = connect_with_credentials(BackendKind::Gemini, &credentials)?;
//!
//!     let prompt = Prompt::new("Return the greatest common factor of num1 and num2")
//!         .with_parameter("num1", 45)
//!         .with_parameter("num2", 60);
//!
//!     let gcf: u64 = client.call_as(&CallContext::new(), &prompt).await?;
//!     println!("{gcf}");
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/anyfunc/latest")]

pub mod connect;
pub mod credentials;

pub use anyfunc_core::*;
pub use anyfunc_core::{
    backend::BackendKind, context::CallContext, error::AnyFuncError, prompt::Prompt,
};
pub use connect::{DynClient, connect, connect_by_name, connect_with_credentials};
pub use credentials::Credentials;

#[cfg(feature = "openai")]
pub use anyfunc_openai as openai;

#[cfg(feature = "gemini")]
pub use anyfunc_gemini as gemini;
