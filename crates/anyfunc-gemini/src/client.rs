use reqwest::Client as HttpClient;

use crate::{
    api_v1beta::{GenerateContentRequest, GenerateContentResponse},
    error::GeminiError,
};

pub(crate) const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Minimal HTTP client for Gemini’s *generateContent* endpoint.
///
/// Shares a single `reqwest::Client`, so cloning is cheap and concurrent use
/// is safe.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, http: HttpClient, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base: base_url
                .map(|base| base.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{model}:generateContent", self.base);
        tracing::debug!(%url, "sending generate content");

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!(%status, "generate content answered");

        if !status.is_success() {
            let body = resp.text().await?;
            return Err(GeminiError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }
}
