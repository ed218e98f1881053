//! Language model backends.
//!
//! The conversation engine only needs "prompt context in, reply text out";
//! [`OllamaBackend`] implements that against a local or remote Ollama server.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::PromptContext;
use crate::storage::LlmConfig;

/// Backend failures. Never shown to the user; the engine falls back instead.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Backend turned off in configuration
    #[error("language model disabled in configuration")]
    Disabled,

    /// Backend settings are unusable
    #[error("invalid backend configuration: {0}")]
    Config(String),

    /// Transport failure (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status
    #[error("API error: {0}")]
    Api(String),

    /// Response body not understood
    #[error("parse error: {0}")]
    Parse(String),
}

/// An external text generator.
pub trait ChatBackend {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Produce a reply for the given context.
    fn generate(&self, context: &PromptContext) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Ollama `/api/generate` client.
pub struct OllamaBackend {
    client: Client,
    endpoint: Url,
    model: String,
}

impl OllamaBackend {
    /// Build a backend from configuration.
    ///
    /// # Errors
    /// [`LlmError::Disabled`] when turned off, [`LlmError::Config`] for a bad
    /// base URL or client setup.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.enabled {
            return Err(LlmError::Disabled);
        }

        let mut base = Url::parse(&config.base_url).map_err(|e| LlmError::Config(format!("{}: {e}", config.base_url)))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("api/generate")
            .map_err(|e| LlmError::Config(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn generate(&self, context: &PromptContext) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: context.render(),
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(LlmError::Api(error_resp.error));
            }
            return Err(LlmError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(LlmError::Parse("empty response".to_string()));
        }
        Ok(text.to_string())
    }
}
