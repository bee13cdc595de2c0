//! Run-time backend selection.
//!
//! [`connect`] turns a [`BackendKind`] plus an API key into a client whose
//! adapter is chosen once and boxed. A backend that is unknown or whose cargo
//! feature is disabled fails here, at construction, with
//! [`ConstructionError::UnsupportedBackend`]; no half-built client is ever
//! returned.
use anyfunc_core::{
    AnyFuncClient,
    backend::BackendKind,
    error::{ConstructionError, Result},
    provider::InvokeProvider,
};

use crate::credentials::Credentials;

/// A client whose backend was picked at run time.
pub type DynClient = AnyFuncClient<Box<dyn InvokeProvider>>;

/// Build a client for `kind`, authenticated with `api_key`.
pub fn connect(kind: BackendKind, api_key: impl Into<String>) -> Result<DynClient> {
    let backend = backend_for(kind, api_key.into())?;
    tracing::debug!(backend = %kind, model = backend.model(), "client ready");
    Ok(AnyFuncClient::new(backend))
}

/// Like [`connect`], with the backend given by name (`"openai"`, `"gemini"`).
pub fn connect_by_name(name: &str, api_key: impl Into<String>) -> Result<DynClient> {
    let kind: BackendKind = name.parse()?;
    connect(kind, api_key)
}

/// Like [`connect`], taking the key for `kind` from `credentials`.
pub fn connect_with_credentials(kind: BackendKind, credentials: &Credentials) -> Result<DynClient> {
    let api_key = credentials.key_for(kind).ok_or_else(|| {
        ConstructionError::InvalidCredentials(format!("no API key configured for `{kind}`"))
    })?;
    connect(kind, api_key)
}

fn backend_for(kind: BackendKind, api_key: String) -> Result<Box<dyn InvokeProvider>> {
    match kind {
        #[cfg(feature = "openai")]
        BackendKind::OpenAi => Ok(Box::new(
            anyfunc_openai::OpenAiAdapterBuilder::new()
                .with_api_key(api_key)
                .build()?,
        )),
        #[cfg(feature = "gemini")]
        BackendKind::Gemini => Ok(Box::new(
            anyfunc_gemini::GeminiAdapterBuilder::new()
                .with_api_key(api_key)
                .build()?,
        )),
        #[allow(unreachable_patterns)]
        other => Err(ConstructionError::UnsupportedBackend {
            name: other.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use anyfunc_core::error::AnyFuncError;

    use super::*;

    #[test]
    fn unknown_name_fails_at_construction() {
        let err = connect_by_name("claude", "key").unwrap_err();
        assert!(matches!(
            err,
            AnyFuncError::Construction(ConstructionError::UnsupportedBackend { ref name })
                if name == "claude"
        ));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn openai_client_is_bound_to_openai() {
        let client = connect(BackendKind::OpenAi, "sk-test").unwrap();
        assert_eq!(client.kind(), BackendKind::OpenAi);
        assert_eq!(client.backend().model(), "gpt-5");
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn gemini_client_is_bound_to_gemini() {
        let client = connect_by_name("Gemini", "g-test").unwrap();
        assert_eq!(client.kind(), BackendKind::Gemini);
        assert_eq!(client.backend().model(), "gemini-2.5-flash");
    }

    #[test]
    fn blank_key_fails_at_construction() {
        for kind in BackendKind::ALL {
            let err = connect(kind, "  ").unwrap_err();
            assert!(err.is_construction(), "{kind}");
        }
    }

    #[test]
    fn missing_credential_fails_at_construction() {
        let err =
            connect_with_credentials(BackendKind::Gemini, &Credentials::default()).unwrap_err();
        assert!(matches!(
            err,
            AnyFuncError::Construction(ConstructionError::InvalidCredentials(_))
        ));
    }
}
