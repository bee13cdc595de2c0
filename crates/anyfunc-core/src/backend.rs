//! Backend identifiers used throughout the **anyfunc** workspace.
//!
//! A [`BackendKind`] names one LLM provider integration. The set is closed:
//! each variant corresponds to exactly one adapter crate, and each adapter
//! talks to exactly one fixed model.
//!
//! # Adding more backends
//!
//! 1. **Variant** – add it here and extend [`BackendKind::name`] and the
//!    `FromStr` impl.
//! 2. **Adapter** – implement [`InvokeProvider`](crate::provider::InvokeProvider)
//!    in a new provider crate.
//! 3. **Dispatch** – wire the variant in the umbrella crate's `connect`
//!    function. The compiler points at every `match` you forgot.
//!
//! # Example
//!
//! ```rust
//! use anyfunc_core::backend::BackendKind;
//!
//! let kind: BackendKind = "Gemini".parse().unwrap();
//! assert_eq!(kind, BackendKind::Gemini);
//! assert_eq!(kind.to_string(), "gemini");
//! ```
use std::{fmt::Display, str::FromStr};

use crate::error::ConstructionError;

/// The provider family a client is bound to for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Chat-completion style API: an ordered list of `{role, content}`
    /// messages, system first.
    OpenAi,
    /// Generative-content style API: a single text blob plus a separate
    /// system-instruction field.
    Gemini,
}

impl BackendKind {
    /// All variants, in declaration order.
    pub const ALL: [BackendKind; 2] = [BackendKind::OpenAi, BackendKind::Gemini];

    /// Canonical lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::OpenAi => "openai",
            BackendKind::Gemini => "gemini",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConstructionError::UnsupportedBackend {
                name: wanted.to_owned(),
            })
    }
}
