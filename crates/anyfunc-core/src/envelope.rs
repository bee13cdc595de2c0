//! The reply **contract** every backend is asked to honour.
//!
//! The system instruction asks the model for a single JSON object:
//!
//! ```json
//! { "result": 15, "successful": true }
//! { "successful": false, "error": "cannot compute" }
//! ```
//!
//! Nothing on the provider side enforces this shape, so [`parse`] checks it
//! defensively:
//!
//! 1. the reply must be a JSON object, else [`AnyFuncError::Malformed`];
//! 2. an `"error"` field always wins, whatever `"successful"` says, and yields
//!    [`AnyFuncError::DeclaredFailure`];
//! 3. otherwise the object is the success payload. `"successful"` is advisory
//!    only; it is lifted out of the payload into [`Envelope::successful`].
use serde_json::{Map, Value};

use crate::{
    error::{AnyFuncError, Result},
    prompt::json_kind,
};

pub const RESULT_FIELD: &str = "result";
pub const SUCCESSFUL_FIELD: &str = "successful";
pub const ERROR_FIELD: &str = "error";

/// A reply that passed the contract check.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// The model's own success flag, if it sent a boolean one.
    pub successful: Option<bool>,
    /// All remaining fields, in reply order.
    pub payload: Map<String, Value>,
}

impl Envelope {
    pub fn parse(raw: &str) -> Result<Self> {
        parse(raw)
    }

    /// The conventional `"result"` field, if present.
    pub fn result(&self) -> Option<&Value> {
        self.payload.get(RESULT_FIELD)
    }

    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }
}

/// Classify a raw reply against the envelope convention.
pub fn parse(raw: &str) -> Result<Envelope> {
    let body = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(body).map_err(|err| {
        tracing::warn!(error = %err, "reply is not valid JSON");
        AnyFuncError::Malformed {
            raw: raw.to_owned(),
            reason: err.to_string(),
        }
    })?;

    let mut payload = match value {
        Value::Object(payload) => payload,
        other => {
            tracing::warn!(kind = json_kind(&other), "reply is not a JSON object");
            return Err(AnyFuncError::Malformed {
                raw: raw.to_owned(),
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            });
        }
    };

    if let Some(message) = declared_error(&payload) {
        tracing::warn!(%message, "model declared failure");
        return Err(AnyFuncError::DeclaredFailure { message, payload });
    }

    let successful = match payload.shift_remove(SUCCESSFUL_FIELD) {
        Some(Value::Bool(flag)) => Some(flag),
        _ => None,
    };

    Ok(Envelope {
        successful,
        payload,
    })
}

/// `"error": null` counts as absent; a non-text error is rendered as JSON.
fn declared_error(payload: &Map<String, Value>) -> Option<String> {
    match payload.get(ERROR_FIELD)? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Unwrap a reply fenced as a single Markdown code block.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (`json`, `JSON`, …) on the opening line.
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => text,
    }
}
