//! Per-user state passed explicitly to every operation.
//!
//! A [`Session`] bundles the profile, the symptom log and the conversation.
//! [`SessionManager`] owns several sessions keyed by id for hosts that
//! serve more than one user.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{ConversationEngine, ConversationMessage, Reply};
use crate::cycle::CyclePosition;
use crate::error::{CoreError, Result};
use crate::insights::{is_insight_due, InsightGenerator};
use crate::profile::{OnboardingForm, UserProfile};
use crate::storage::CycleConfig;
use crate::symptoms::{Intensity, Symptom, SymptomEntry, SymptomLog};

/// What happened when a symptom was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOutcome {
    pub entry: SymptomEntry,
    /// Insight appended to the conversation, if one was due.
    pub insight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub profile: Option<UserProfile>,
    pub log: SymptomLog,
    pub messages: Vec<ConversationMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: None,
            log: SymptomLog::new(),
            messages: Vec::new(),
        }
    }

    pub fn is_onboarded(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.onboarding_complete)
    }

    /// Completed profile or [`CoreError::NotOnboarded`].
    pub fn profile(&self) -> Result<&UserProfile> {
        self.profile
            .as_ref()
            .filter(|p| p.onboarding_complete)
            .ok_or(CoreError::NotOnboarded)
    }

    /// Validates the form, stores the profile and greets the user.
    ///
    /// Running it again replaces the profile; logged entries keep the
    /// cycle data they were stamped with.
    pub fn complete_onboarding(&mut self, form: &OnboardingForm, config: &CycleConfig) -> Result<&UserProfile> {
        let profile = form.complete(config)?;
        self.messages
            .push(ConversationMessage::assistant(profile.welcome_message()));
        Ok(self.profile.insert(profile))
    }

    /// Cycle position on `today`; unknown when not onboarded.
    pub fn position(&self, today: NaiveDate, default_length: u32) -> CyclePosition {
        match &self.profile {
            Some(profile) => profile.position_on(today),
            None => CyclePosition::on(today, None, default_length),
        }
    }

    /// Logs a symptom and, every `every_n_logs` entries, posts an insight.
    pub fn log_symptom(
        &mut self,
        today: NaiveDate,
        symptom: Symptom,
        intensity: Intensity,
        notes: impl Into<String>,
        insights: &mut InsightGenerator,
        every_n_logs: usize,
    ) -> Result<LogOutcome> {
        let profile = self.profile()?.clone();
        let entry = self
            .log
            .log_symptom(&profile, today, symptom, intensity, notes)
            .clone();

        let insight = if is_insight_due(self.log.len(), every_n_logs) {
            let message = insights.message();
            self.messages.push(ConversationMessage::assistant(message.clone()));
            Some(message)
        } else {
            None
        };

        Ok(LogOutcome { entry, insight })
    }

    /// Appends the user's message and exactly one assistant reply.
    pub fn chat(&mut self, engine: &mut ConversationEngine, today: NaiveDate, input: &str) -> Result<Reply> {
        let position = self.profile()?.position_on(today);
        let context = engine.build_context(&self.messages, &position, &self.log, input);
        let reply = engine.respond(&context);

        self.messages.push(ConversationMessage::user(input));
        self.messages
            .push(ConversationMessage::assistant(reply.text.clone()));
        Ok(reply)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Sessions keyed by id.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<Uuid, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an empty session and returns its id.
    pub fn create(&mut self) -> Uuid {
        self.insert(Session::new())
    }

    /// Adopts an existing session (e.g. one loaded from storage).
    pub fn insert(&mut self, session: Session) -> Uuid {
        let id = session.id;
        self.sessions.insert(id, session);
        id
    }

    pub fn get(&self, id: Uuid) -> Result<&Session> {
        self.sessions.get(&id).ok_or(CoreError::SessionNotFound(id))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut Session> {
        self.sessions
            .get_mut(&id)
            .ok_or(CoreError::SessionNotFound(id))
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Session> {
        self.sessions
            .remove(&id)
            .ok_or(CoreError::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ReplySource, Role};
    use crate::cycle::Phase;
    use crate::storage::ChatConfig;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn onboarded() -> Session {
        let mut session = Session::new();
        let form = OnboardingForm {
            name: "Mia".to_string(),
            age: Some(29),
            cycle_length: Some(28),
            last_period_date: Some(date(1)),
        };
        session
            .complete_onboarding(&form, &CycleConfig::default())
            .unwrap();
        session
    }

    #[test]
    fn onboarding_posts_welcome() {
        let session = onboarded();
        assert!(session.is_onboarded());
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::Assistant);
        assert!(session.messages[0].content.starts_with("Hi Mia! I'm Bloom"));
    }

    #[test]
    fn invalid_onboarding_leaves_session_untouched() {
        let mut session = Session::new();
        let form = OnboardingForm {
            name: "  ".to_string(),
            ..OnboardingForm::default()
        };
        assert!(matches!(
            session.complete_onboarding(&form, &CycleConfig::default()),
            Err(CoreError::Validation(_))
        ));
        assert!(session.profile.is_none());
        assert!(session.messages.is_empty());
    }

    #[test]
    fn logging_requires_onboarding() {
        let mut session = Session::new();
        let mut insights = InsightGenerator::new(Some(1));
        let result = session.log_symptom(date(5), Symptom::Cramps, Intensity::default(), "", &mut insights, 3);
        assert!(matches!(result, Err(CoreError::NotOnboarded)));
        assert!(session.log.is_empty());
    }

    #[test]
    fn every_third_log_posts_an_insight() {
        let mut session = onboarded();
        let mut insights = InsightGenerator::new(Some(7));
        let mut posted = Vec::new();
        for day in 1..=6 {
            let outcome = session
                .log_symptom(date(day), Symptom::Fatigue, Intensity::default(), "", &mut insights, 3)
                .unwrap();
            posted.push(outcome.insight.is_some());
        }
        assert_eq!(posted, [false, false, true, false, false, true]);
        let insight_messages = session
            .messages
            .iter()
            .filter(|m| m.content.starts_with("**Blossom Insight**: "))
            .count();
        assert_eq!(insight_messages, 2);
    }

    #[test]
    fn logged_entry_is_stamped_with_phase() {
        let mut session = onboarded();
        let mut insights = InsightGenerator::new(Some(1));
        let outcome = session
            .log_symptom(date(20), Symptom::MoodSwings, Intensity::new(4).unwrap(), "", &mut insights, 3)
            .unwrap();
        assert_eq!(outcome.entry.cycle_day, Some(20));
        assert_eq!(outcome.entry.phase, Phase::Luteal);
    }

    #[test]
    fn chat_appends_one_user_and_one_assistant_message() {
        let mut session = onboarded();
        let mut engine = ConversationEngine::offline(&ChatConfig::default());
        let reply = session.chat(&mut engine, date(3), "I feel so tired").unwrap();

        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[1], ConversationMessage::user("I feel so tired"));
        assert_eq!(session.messages[2].content, reply.text);
    }

    #[test]
    fn chat_requires_onboarding() {
        let mut session = Session::new();
        let mut engine = ConversationEngine::offline(&ChatConfig::default());
        assert!(matches!(
            session.chat(&mut engine, date(3), "hi"),
            Err(CoreError::NotOnboarded)
        ));
        assert!(session.messages.is_empty());
    }

    #[test]
    fn manager_tracks_sessions_by_id() {
        let mut manager = SessionManager::new();
        let id = manager.create();
        manager.get_mut(id).unwrap().messages.push(ConversationMessage::user("x"));
        assert_eq!(manager.get(id).unwrap().messages.len(), 1);

        let removed = manager.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(manager.is_empty());
        assert!(matches!(manager.get(id), Err(CoreError::SessionNotFound(missing)) if missing == id));
    }
}
