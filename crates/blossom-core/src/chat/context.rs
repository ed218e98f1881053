use indoc::formatdoc;
use serde::{Deserialize, Serialize};

use super::{ConversationMessage, Role};
use crate::cycle::CyclePosition;
use crate::symptoms::SymptomLog;

/// Everything the language model sees for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    /// Prior turns, one per line.
    pub chat_history: String,
    pub cycle_day: String,
    pub phase: String,
    pub recent_symptoms: String,
    pub user_input: String,
}

impl PromptContext {
    /// Builds the context for a new user utterance.
    ///
    /// `history` holds the turns before `user_input`.
    pub fn build(
        history: &[ConversationMessage],
        position: &CyclePosition,
        log: &SymptomLog,
        recent_count: usize,
        user_input: &str,
    ) -> Self {
        Self {
            chat_history: format_history(history),
            cycle_day: position.day_label(),
            phase: position.phase.label().to_string(),
            recent_symptoms: log.recent_summary(recent_count),
            user_input: user_input.to_string(),
        }
    }

    /// Renders the Blossom persona prompt.
    pub fn render(&self) -> String {
        formatdoc! {"
            You are Bloom, an empathetic AI assistant specializing in women's hormonal health and wellness.
            You're speaking with a woman who may be experiencing hormonal issues like PCOS, mood swings,
            irregular periods, or other symptoms. Be gentle, supportive, and knowledgeable.

            Current conversation:
            {chat_history}

            User information:
            - Current cycle day: {cycle_day}
            - Current phase: {phase}
            - Recent symptoms: {recent_symptoms}

            User: {user_input}
            Blossom:",
            chat_history = self.chat_history,
            cycle_day = self.cycle_day,
            phase = self.phase,
            recent_symptoms = self.recent_symptoms,
            user_input = self.user_input,
        }
    }
}

fn format_history(history: &[ConversationMessage]) -> String {
    history
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                Role::User => "User",
                Role::Assistant => "Blossom",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
