//! User profile and onboarding.
//!
//! The profile is created once by [`OnboardingForm::complete`] and provides
//! the cycle inputs for every symptom stamped afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle::CyclePosition;
use crate::error::ValidationError;
use crate::storage::CycleConfig;

/// The user's onboarding answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub cycle_length: u32,
    pub last_period_date: Option<NaiveDate>,
    pub onboarding_complete: bool,
}

impl UserProfile {
    /// Where the user is in their cycle on `today`.
    pub fn position_on(&self, today: NaiveDate) -> CyclePosition {
        CyclePosition::on(today, self.last_period_date, self.cycle_length)
    }

    /// Greeting added to the conversation when onboarding completes.
    pub fn welcome_message(&self) -> String {
        format!(
            "Hi {}! I'm Bloom, your hormonal wellness companion. How are you feeling today?",
            self.name
        )
    }
}

/// Raw onboarding input, validated against [`CycleConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingForm {
    pub name: String,
    pub age: Option<u32>,
    pub cycle_length: Option<u32>,
    pub last_period_date: Option<NaiveDate>,
}

/// Default age offered by the onboarding form.
const DEFAULT_AGE: u32 = 30;

impl OnboardingForm {
    /// Validates the answers and builds a completed profile.
    ///
    /// Missing age and cycle length take the form defaults (30 and the
    /// configured default length); a missing last period date is kept as
    /// unknown.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the name is blank or a number is
    /// outside the configured range.
    pub fn complete(&self, config: &CycleConfig) -> Result<UserProfile, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name".to_string()));
        }

        let age = self.age.unwrap_or(DEFAULT_AGE);
        check_range("age", age, config.min_age, config.max_age)?;

        let cycle_length = self.cycle_length.unwrap_or(config.default_length);
        check_range("cycle_length", cycle_length, config.min_length, config.max_length)?;

        tracing::info!(cycle_length, has_last_period = self.last_period_date.is_some(), "onboarding complete");

        Ok(UserProfile {
            name: name.to_string(),
            age,
            cycle_length,
            last_period_date: self.last_period_date,
            onboarding_complete: true,
        })
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}
