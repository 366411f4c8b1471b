//! Chat-completion backends used for search summaries.
//!
//! Both variants accept a system/user message pair and answer with a lazy,
//! finite stream of text deltas; they differ only in request shape and in
//! how the response body is decoded.

pub mod ollama;
pub mod openai;

use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::PageError;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Hosted models served by the OpenAI-compatible API
pub const HOSTED_MODELS: &[&str] = &["gpt-4", "gpt-3.5-turbo"];
/// Open-weight models served through the Ollama gateway
pub const LOCAL_MODELS: &[&str] = &["qwen2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Incremental text deltas; finite and not restartable
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, PageError>> + Send>>;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier sent upstream
    fn model(&self) -> &str;

    async fn stream_chat(
        &self,
        system: &ChatMessage,
        user: &ChatMessage,
    ) -> Result<DeltaStream, PageError>;
}

/// Model name to backend, chosen by configuration rather than per call site
#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn ChatBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hosted and local models from configuration
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let mut registry = Self::new();
        for model in HOSTED_MODELS {
            registry.register(
                *model,
                Arc::new(OpenAiBackend::new(
                    client.clone(),
                    config.openai_api.clone(),
                    config.openai_api_key.clone(),
                    *model,
                )),
            );
        }
        for model in LOCAL_MODELS {
            registry.register(
                *model,
                Arc::new(OllamaBackend::new(client.clone(), config.ollama_host.clone(), *model)),
            );
        }
        registry
    }

    pub fn register(&mut self, model: impl Into<String>, backend: Arc<dyn ChatBackend>) {
        self.backends.insert(model.into(), backend);
    }

    pub fn select(&self, model: &str) -> Result<Arc<dyn ChatBackend>, PageError> {
        self.backends
            .get(model)
            .cloned()
            .ok_or_else(|| PageError::UnknownBackend(model.to_string()))
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}
