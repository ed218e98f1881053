//! Companion conversation.
//!
//! - [`ConversationEngine`] builds the prompt context and picks a reply source.
//! - [`ChatBackend`] is the seam to an external language model; [`OllamaBackend`]
//!   is the HTTP implementation.
//! - [`FallbackResponder`] answers deterministically when no backend is usable.

mod context;
mod engine;
mod fallback;
mod llm;

pub use context::PromptContext;
pub use engine::{ConversationEngine, Reply, ReplySource};
pub use fallback::{FallbackResponder, KeywordTopic, FALLBACK_TEMPLATES};
pub use llm::{ChatBackend, LlmError, OllamaBackend};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(crate::error::ValidationError::InvalidValue {
                field: "role".to_string(),
                message: format!("unknown role '{other}'"),
            }),
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::User, Role::Assistant] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn message_serializes_lowercase_role() {
        let json = serde_json::to_string(&ConversationMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
