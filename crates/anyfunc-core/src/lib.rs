//! Provider-agnostic core of the **anyfunc** SDK.
//!
//! | Module         | What it provides                                              |
//! |----------------|---------------------------------------------------------------|
//! | [`prompt`]     | `Prompt` and its deterministic text encoding                  |
//! | [`provider`]   | `InvokeProvider`, the seam every backend adapter implements    |
//! | [`envelope`]   | Contract check of the raw reply (`successful` / `error`)      |
//! | [`decode`]     | Generic or typed decoding of the success payload              |
//! | [`client`]     | `AnyFuncClient`, gluing the above together                    |
//! | [`context`]    | Per-call cancellation token and deadline                      |
//! | [`error`]      | `AnyFuncError`, the single error type of the workspace        |
//!
//! The core never touches the network, files or the environment; adapters
//! (`anyfunc-openai`, `anyfunc-gemini`) and the umbrella crate do.
pub mod backend;
pub mod client;
pub mod context;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod provider;

pub use client::{call_as, AnyFuncClient, FunctionCaller, DEFAULT_SYSTEM_INSTRUCTION};
