//! Unified error type exposed by **`anyfunc-core`**.
//!
//! Provider crates convert their internal errors into [`AnyFuncError::Transport`]
//! before bubbling them up to the [`AnyFuncClient`](crate::AnyFuncClient).
//! Everything else (encoding, contract and decode failures) originates in this
//! crate. Each variant keeps enough context (raw reply, payload, field name) to
//! diagnose a failure without querying the backend again.
//!
//! The variants fall into three groups callers usually branch on:
//!
//! * **the plumbing failed** – [`AnyFuncError::is_transport`],
//!   [`AnyFuncError::is_contract_violation`], cancellation,
//! * **the model failed the task** – [`AnyFuncError::is_declared_failure`],
//! * **the answer has the wrong shape** – [`AnyFuncError::is_decode_error`].
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AnyFuncError>;

#[derive(Debug, Error)]
pub enum AnyFuncError {
    /// The client could not be built. Nothing was sent.
    #[error("cannot construct client: {0}")]
    Construction(#[from] ConstructionError),

    /// The prompt parameters cannot be rendered as a JSON mapping.
    #[error("cannot encode prompt parameters: {0}")]
    Encoding(String),

    /// Network, authentication, rate limiting or an empty generation. The
    /// source carries the provider's original error text.
    #[error("{backend} transport error: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The caller aborted the call or its deadline expired.
    #[error("call cancelled: {0}")]
    Cancelled(CancelReason),

    /// The reply is not a JSON mapping.
    #[error("malformed reply ({reason}): {raw}")]
    Malformed { raw: String, reason: String },

    /// The model reported that it could not complete the task.
    #[error("model declared failure: {message}")]
    DeclaredFailure {
        message: String,
        payload: Map<String, Value>,
    },

    /// A scalar result was requested but the payload has no such field.
    #[error("reply has no `{field}` field")]
    MissingField {
        field: &'static str,
        payload: Map<String, Value>,
    },

    /// The field exists but cannot be converted into the requested scalar.
    #[error("field `{field}` is not {expected}: {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: Value,
    },

    /// The payload cannot be deserialised into the requested structured type.
    #[error("reply does not match the requested shape: {reason}")]
    SchemaMismatch {
        reason: String,
        payload: Map<String, Value>,
    },
}

impl AnyFuncError {
    /// Wrap a provider-specific error as a transport failure.
    pub fn transport<E>(backend: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AnyFuncError::Transport {
            backend,
            source: Box::new(source),
        }
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, AnyFuncError::Construction(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AnyFuncError::Transport { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnyFuncError::Cancelled(_))
    }

    /// `true` if the model itself refused or failed the task.
    pub fn is_declared_failure(&self) -> bool {
        matches!(self, AnyFuncError::DeclaredFailure { .. })
    }

    /// `true` if the reply did not follow the envelope convention at all.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AnyFuncError::Malformed { .. })
    }

    /// `true` for failures while populating the caller's typed result.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            AnyFuncError::MissingField { .. }
                | AnyFuncError::TypeMismatch { .. }
                | AnyFuncError::SchemaMismatch { .. }
        )
    }
}

/// Reasons a client could not be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The requested backend is unknown or was not compiled in.
    #[error("unsupported backend `{name}`")]
    UnsupportedBackend { name: String },

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Token,
    /// The per-call deadline elapsed.
    Timeout(Duration),
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Token => write!(f, "cancellation requested"),
            CancelReason::Timeout(after) => write!(f, "timed out after {after:?}"),
        }
    }
}
