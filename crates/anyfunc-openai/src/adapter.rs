use std::{env, sync::Arc, time::Duration};

use anyfunc_core::error::{ConstructionError, Result};
use reqwest::{Client as HttpClient, header::HeaderValue};

use crate::client::OpenAiClient;

/// Model used for every call through this adapter.
pub const MODEL: &str = "gpt-5";

/// Environment variable read by [`OpenAiAdapterBuilder::new_from_env`].
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Thin wrapper that wires the HTTP client [`OpenAiClient`] into a value that
/// implements [`anyfunc_core::provider::InvokeProvider`].
///
/// Think of it as the **service locator** for the OpenAI back-end:
///
/// * stores the API key and base URL,
/// * owns a shareable, connection-pooled `reqwest::Client`,
/// * provides a fluent [`OpenAiAdapterBuilder`] so callers don’t have to juggle
///   `Option<String>` manually.
///
/// All user-facing functionality sits on [`anyfunc_core::AnyFuncClient`] once
/// the adapter is plugged in.
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use anyfunc_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http: Option<HttpClient>,
    timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor that tries to load the `OPENAI_API_KEY`
    /// environment variable. Missing keys only surface during [`Self::build`].
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

    /// Point the adapter at a proxy or compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a pre-configured `reqwest::Client` (proxy, custom TLS, …). The
    /// timeout set with [`Self::with_timeout`] is ignored in that case.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Overall HTTP timeout of the default client (120 s unless set).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`ConstructionError::InvalidCredentials`] – the key is missing, blank
    ///   or cannot be sent as an HTTP header.
    /// * [`ConstructionError::HttpClient`] – the default HTTP client failed to
    ///   initialise.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = validate_api_key(self.api_key)?;

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(|err| ConstructionError::HttpClient(err.to_string()))?,
        };

        Ok(OpenAiAdapter {
            client: Arc::new(OpenAiClient::new(api_key, http, self.base_url)),
        })
    }
}

fn validate_api_key(api_key: Option<String>) -> std::result::Result<String, ConstructionError> {
    let api_key = api_key
        .map(|key| key.trim().to_owned())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ConstructionError::InvalidCredentials(format!(
                "missing OpenAI API key (set `{API_KEY_ENV}`)"
            ))
        })?;

    HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
        ConstructionError::InvalidCredentials(
            "OpenAI API key contains characters not allowed in an HTTP header".into(),
        )
    })?;

    Ok(api_key)
}
