//! API keys for the application layer.
//!
//! The core never reads files or the environment; this module does it for
//! programs built on top. Keys come from a small YAML file
//!
//! ```yaml
//! openAI: sk-...
//! gemini: AIza...
//! ```
//!
//! and any key left blank is filled from `OPENAI_API_KEY` / `GEMINI_API_KEY`.
use std::{env, fs, io, path::Path};

use anyfunc_core::backend::BackendKind;
use serde::Deserialize;

/// File name [`Credentials::load`] looks for when no path is given.
pub const DEFAULT_FILE: &str = "api_key.yaml";

const OPENAI_ENV: &str = "OPENAI_API_KEY";
const GEMINI_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("cannot read credentials file: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse credentials file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(rename = "openAI", default)]
    pub openai: Option<String>,
    #[serde(default)]
    pub gemini: Option<String>,
}

impl Credentials {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CredentialsError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Read `path` if it exists, then fill blanks from the environment.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let mut credentials = match Self::from_yaml_file(path) {
            Ok(credentials) => credentials,
            Err(CredentialsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no credentials file, using environment");
                Self::default()
            }
            Err(err) => return Err(err),
        };
        credentials.fill_from_env();
        Ok(credentials)
    }

    /// Fill every missing key from its environment variable.
    pub fn fill_from_env(&mut self) {
        self.fill_with(|name| env::var(name).ok());
    }

    fn fill_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (slot, name) in [(&mut self.openai, OPENAI_ENV), (&mut self.gemini, GEMINI_ENV)] {
            if slot.as_deref().is_none_or(|key| key.trim().is_empty()) {
                *slot = lookup(name).filter(|key| !key.trim().is_empty());
            }
        }
    }

    pub fn key_for(&self, kind: BackendKind) -> Option<&str> {
        let key = match kind {
            BackendKind::OpenAi => self.openai.as_deref(),
            BackendKind::Gemini => self.gemini.as_deref(),
        };
        key.filter(|key| !key.trim().is_empty())
    }
}
