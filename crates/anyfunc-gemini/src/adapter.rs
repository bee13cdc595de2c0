use std::{env, sync::Arc, time::Duration};

use anyfunc_core::error::{ConstructionError, Result};
use reqwest::{Client as HttpClient, header::HeaderValue};

use crate::client::GeminiClient;

/// Model used for every call through this adapter.
pub const MODEL: &str = "gemini-2.5-flash";

/// Environment variable read by [`GeminiAdapterBuilder::new_from_env`].
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Wires [`GeminiClient`] into an
/// [`InvokeProvider`](anyfunc_core::provider::InvokeProvider).
pub struct GeminiAdapter {
    pub(crate) client: Arc<GeminiClient>,
}

/// Builder for [`GeminiAdapter`], mirroring the OpenAI one.
///
/// ```rust,no_run
/// use anyfunc_gemini::GeminiAdapterBuilder;
///
/// let backend = GeminiAdapterBuilder::new_from_env()
///     .build()
///     .expect("GEMINI_API_KEY must be set");
/// ```
#[derive(Default)]
pub struct GeminiAdapterBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http: Option<HttpClient>,
    timeout: Option<Duration>,
}

impl GeminiAdapterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the key from `GEMINI_API_KEY`. Missing keys surface in
    /// [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a pre-configured `reqwest::Client`; [`Self::with_timeout`] is
    /// ignored then.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// # Errors
    ///
    /// [`ConstructionError::InvalidCredentials`] for a missing, blank or
    /// non-header-safe key; [`ConstructionError::HttpClient`] if the default
    /// HTTP client fails to initialise.
    pub fn build(self) -> Result<GeminiAdapter> {
        let api_key = self
            .api_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ConstructionError::InvalidCredentials(format!(
                    "missing Gemini API key (set `{API_KEY_ENV}`)"
                ))
            })?;

        if HeaderValue::from_str(&api_key).is_err() {
            return Err(ConstructionError::InvalidCredentials(
                "Gemini API key contains characters not allowed in an HTTP header".into(),
            )
            .into());
        }

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(|err| ConstructionError::HttpClient(err.to_string()))?,
        };

        Ok(GeminiAdapter {
            client: Arc::new(GeminiClient::new(api_key, http, self.base_url)),
        })
    }
}
