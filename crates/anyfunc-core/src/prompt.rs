//! The caller-facing **prompt**: a natural-language task description plus a
//! keyed parameter set.
//!
//! Encoding is deterministic and backend-independent:
//!
//! ```text
//! <description>
//!
//! {
//!   "num1": 45,
//!   "num2": 60
//! }
//! ```
//!
//! The parameters are rendered as pretty-printed JSON (two-space indent) in
//! insertion order. Keys are never renamed or sorted.
//!
//! ```rust
//! use anyfunc_core::prompt::Prompt;
//!
//! let prompt = Prompt::new("Return the greatest common factor of num1 and num2")
//!     .with_parameter("num1", 45)
//!     .with_parameter("num2", 60);
//!
//! let text = prompt.encode().unwrap();
//! assert!(text.starts_with("Return the greatest common factor"));
//! assert!(text.ends_with("\"num2\": 60\n}"));
//! ```
//!
//! Any `Serialize` value that renders as a JSON object works as parameter set,
//! so a plain struct is fine too:
//!
//! ```rust
//! use anyfunc_core::prompt::Prompt;
//!
//! #[derive(serde::Serialize)]
//! struct Shout<'a> { text: &'a str }
//!
//! let prompt = Prompt::with_parameters("Uppercase `text`.", Shout { text: "hi" });
//! assert!(prompt.encode().is_ok());
//! ```
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AnyFuncError, Result};

/// Default parameter container: an insertion-ordered JSON mapping.
pub type Parameters = Map<String, Value>;

/// Separator between the description and the encoded parameters.
const SEPARATOR: &str = "\n\n";

/// A task description plus its parameters.
///
/// Carries no backend-specific data, so the same value encodes identically for
/// every backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt<P = Parameters> {
    description: String,
    parameters: P,
}

impl Prompt<Parameters> {
    /// Start a prompt with an empty parameter mapping.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            parameters: Parameters::new(),
        }
    }

    /// Append (or replace) a single parameter. Insertion order is kept.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

impl<P: Serialize> Prompt<P> {
    /// Build a prompt from any serialisable parameter set.
    pub fn with_parameters(description: impl Into<String>, parameters: P) -> Self {
        Self {
            description: description.into(),
            parameters,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    /// Render the user text sent to the backend.
    ///
    /// # Errors
    ///
    /// [`AnyFuncError::Encoding`] if the parameters fail to serialise or do not
    /// form a keyed mapping.
    pub fn encode(&self) -> Result<String> {
        let parameters = encode_parameters(&self.parameters)?;
        Ok(format!("{}{SEPARATOR}{parameters}", self.description))
    }
}

/// Pretty-print `parameters` as a JSON object.
pub fn encode_parameters<P>(parameters: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let value =
        serde_json::to_value(parameters).map_err(|err| AnyFuncError::Encoding(err.to_string()))?;

    if !value.is_object() {
        return Err(AnyFuncError::Encoding(format!(
            "parameters must form a keyed mapping, got {}",
            json_kind(&value)
        )));
    }

    serde_json::to_string_pretty(&value).map_err(|err| AnyFuncError::Encoding(err.to_string()))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
