use serde::{Deserialize, Serialize};

use super::fallback::FallbackResponder;
use super::llm::{ChatBackend, LlmError, OllamaBackend};
use super::{ConversationMessage, PromptContext};
use crate::cycle::CyclePosition;
use crate::storage::{ChatConfig, Config};
use crate::symptoms::SymptomLog;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Llm,
    Fallback,
}

/// An assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Chooses between the language model and the fallback responder.
///
/// Backend failures never propagate: they are logged and the fallback
/// answers instead.
pub struct ConversationEngine {
    backend: Option<Box<dyn ChatBackend>>,
    fallback: FallbackResponder,
    recent_symptoms: usize,
}

impl ConversationEngine {
    /// Engine with an explicit backend (or none).
    pub fn new(backend: Option<Box<dyn ChatBackend>>, config: &ChatConfig) -> Self {
        Self {
            backend,
            fallback: FallbackResponder::new(config.seed),
            recent_symptoms: config.recent_symptoms,
        }
    }

    /// Engine that only uses the fallback responder.
    pub fn offline(config: &ChatConfig) -> Self {
        Self::new(None, config)
    }

    /// Engine backed by Ollama as configured.
    ///
    /// A backend that cannot be set up is logged and skipped.
    pub fn from_config(config: &Config) -> Self {
        let backend: Option<Box<dyn ChatBackend>> = match OllamaBackend::from_config(&config.llm) {
            Ok(backend) => Some(Box::new(backend)),
            Err(LlmError::Disabled) => None,
            Err(e) => {
                tracing::warn!("language model unavailable, using fallback replies: {e}");
                None
            }
        };
        Self::new(backend, &config.chat)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Context for a new user utterance; `history` excludes it.
    pub fn build_context(
        &self,
        history: &[ConversationMessage],
        position: &CyclePosition,
        log: &SymptomLog,
        user_input: &str,
    ) -> PromptContext {
        PromptContext::build(history, position, log, self.recent_symptoms, user_input)
    }

    /// Produces exactly one reply for the context.
    pub fn respond(&mut self, context: &PromptContext) -> Reply {
        if let Some(backend) = &self.backend {
            match backend.generate(context) {
                Ok(text) => {
                    tracing::debug!(backend = backend.name(), "reply from language model");
                    return Reply {
                        text,
                        source: ReplySource::Llm,
                    };
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), "language model failed, using fallback: {e}");
                }
            }
        }

        Reply {
            text: self.fallback.respond(&context.user_input, &context.cycle_day),
            source: ReplySource::Fallback,
        }
    }
}
