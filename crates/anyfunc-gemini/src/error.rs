use anyfunc_core::error::AnyFuncError;
use reqwest::StatusCode;

/// Every failure mode of the Gemini HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t decode response body: {0}")]
    Serde(#[from] serde_json::Error),

    /// Non-2xx answer; `body` is the provider's error text, untouched.
    #[error("Gemini returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Gemini returned no generated text: {0}")]
    EmptyGeneration(String),
}

impl From<GeminiError> for AnyFuncError {
    fn from(value: GeminiError) -> Self {
        AnyFuncError::transport("gemini", value)
    }
}
