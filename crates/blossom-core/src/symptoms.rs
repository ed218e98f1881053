//! Symptom vocabulary and the append-only symptom log.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cycle::{classify_phase, cycle_day, Phase};
use crate::error::ValidationError;
use crate::profile::UserProfile;

/// A symptom from the fixed vocabulary, or free text.
///
/// Equality and hashing go through [`Symptom::name`], so `Other(" ")` equals
/// `Other("")` and `Other("Cramps")` equals `Cramps`, matching how entries
/// are grouped and how they read back from an export.
#[derive(Debug, Clone)]
pub enum Symptom {
    MoodSwings,
    Anxiety,
    Fatigue,
    Bloating,
    Cramps,
    Headache,
    Acne,
    Cravings,
    Other(String),
}

impl Symptom {
    /// The fixed vocabulary, in menu order.
    pub const VOCABULARY: [Symptom; 8] = [
        Symptom::MoodSwings,
        Symptom::Anxiety,
        Symptom::Fatigue,
        Symptom::Bloating,
        Symptom::Cramps,
        Symptom::Headache,
        Symptom::Acne,
        Symptom::Cravings,
    ];

    pub fn name(&self) -> &str {
        match self {
            Symptom::MoodSwings => "Mood swings",
            Symptom::Anxiety => "Anxiety",
            Symptom::Fatigue => "Fatigue",
            Symptom::Bloating => "Bloating",
            Symptom::Cramps => "Cramps",
            Symptom::Headache => "Headache",
            Symptom::Acne => "Acne",
            Symptom::Cravings => "Cravings",
            Symptom::Other(text) if text.trim().is_empty() => "Other",
            Symptom::Other(text) => text.trim(),
        }
    }
}

impl PartialEq for Symptom {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Symptom {}

impl std::hash::Hash for Symptom {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Symptom {
    /// Free-text symptom, normalized: trimmed, blank kept as plain "Other",
    /// vocabulary names mapped to their variant.
    pub fn other(text: impl AsRef<str>) -> Self {
        Self::from_name(text.as_ref())
    }

    /// Case-insensitive match on the vocabulary; anything else is `Other`.
    pub fn from_name(s: &str) -> Self {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();
        let known = Symptom::VOCABULARY
            .iter()
            .find(|symptom| symptom.name().to_lowercase() == lowered)
            .cloned();
        known.unwrap_or_else(|| {
            if lowered == "other" {
                Symptom::Other(String::new())
            } else {
                Symptom::Other(trimmed.to_string())
            }
        })
    }
}

impl FromStr for Symptom {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symptom::from_name(s))
    }
}

impl Serialize for Symptom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Symptom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Symptom::from_name(&raw))
    }
}

/// Symptom intensity on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] outside 1-5.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::OutOfRange {
                field: "intensity".to_string(),
                value,
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for Intensity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged observation.
///
/// `cycle_day` and `phase` are captured from the profile when the entry is
/// created and are never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub date: NaiveDate,
    pub cycle_day: Option<u32>,
    pub phase: Phase,
    pub symptom: Symptom,
    pub intensity: Intensity,
    #[serde(default)]
    pub notes: String,
}

impl SymptomEntry {
    /// Builds an entry stamped with the profile's cycle position on `date`.
    pub fn stamped(
        profile: &UserProfile,
        date: NaiveDate,
        symptom: Symptom,
        intensity: Intensity,
        notes: impl Into<String>,
    ) -> Self {
        let day = cycle_day(date, profile.last_period_date, profile.cycle_length);
        Self {
            date,
            cycle_day: day,
            phase: classify_phase(day, profile.cycle_length),
            symptom,
            intensity,
            notes: notes.into(),
        }
    }

    /// "Cramps (intensity: 4)", the form used in conversation context.
    pub fn summary(&self) -> String {
        format!("{} (intensity: {})", self.symptom, self.intensity)
    }
}

/// Ordered, append-only collection of symptom entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomLog {
    entries: Vec<SymptomEntry>,
}

impl SymptomLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps and appends a new entry.
    pub fn log_symptom(
        &mut self,
        profile: &UserProfile,
        today: NaiveDate,
        symptom: Symptom,
        intensity: Intensity,
        notes: impl Into<String>,
    ) -> &SymptomEntry {
        let entry = SymptomEntry::stamped(profile, today, symptom, intensity, notes);
        tracing::debug!(
            symptom = %entry.symptom,
            intensity = entry.intensity.value(),
            phase = %entry.phase,
            "symptom logged"
        );
        self.push(entry)
    }

    /// Appends an already-stamped entry (used when restoring from storage).
    pub fn push(&mut self, entry: SymptomEntry) -> &SymptomEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[SymptomEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &SymptomEntry> {
        self.entries.iter().rev().take(n)
    }

    /// Summary of the last `n` entries in log order, for prompts.
    pub fn recent_summary(&self, n: usize) -> String {
        if self.entries.is_empty() || n == 0 {
            return "No recent symptoms logged.".to_string();
        }
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..]
            .iter()
            .map(SymptomEntry::summary)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Vec<SymptomEntry>> for SymptomLog {
    fn from(entries: Vec<SymptomEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a SymptomLog {
    type Item = &'a SymptomEntry;
    type IntoIter = std::slice::Iter<'a, SymptomEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile(last_period: Option<NaiveDate>, cycle_length: u32) -> UserProfile {
        UserProfile {
            name: "Ada".to_string(),
            age: 30,
            cycle_length,
            last_period_date: last_period,
            onboarding_complete: true,
        }
    }

    #[test]
    fn symptom_parsing_is_case_insensitive() {
        assert_eq!("mood swings".parse::<Symptom>().unwrap(), Symptom::MoodSwings);
        assert_eq!("CRAMPS".parse::<Symptom>().unwrap(), Symptom::Cramps);
        assert_eq!(
            "Back pain".parse::<Symptom>().unwrap(),
            Symptom::Other("Back pain".to_string())
        );
        assert_eq!("Other".parse::<Symptom>().unwrap().name(), "Other");
    }

    #[test]
    fn blank_and_padded_other_symptoms_compare_by_name() {
        assert_eq!(Symptom::Other(" ".to_string()), Symptom::Other(String::new()));
        assert_eq!(Symptom::Other("  Back pain ".to_string()).name(), "Back pain");
        assert_eq!(Symptom::Other("Cramps".to_string()), Symptom::Cramps);
        assert_eq!(Symptom::other("  "), Symptom::Other(String::new()));
        assert!(matches!(Symptom::other(" cramps "), Symptom::Cramps));
        assert!(matches!(Symptom::other(" Back pain "), Symptom::Other(ref t) if t == "Back pain"));
    }

    #[test]
    fn hand_built_other_entry_survives_json() {
        let p = profile(Some(date(2024, 3, 1)), 28);
        let entry = SymptomEntry::stamped(&p, date(2024, 3, 4), Symptom::Other(" ".into()), Intensity::default(), "");
        let json = serde_json::to_string(&entry).unwrap();
        let back: SymptomEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.symptom.name(), "Other");
    }

    #[test]
    fn intensity_rejects_out_of_range() {
        assert!(Intensity::new(0).is_err());
        assert!(Intensity::new(6).is_err());
        assert_eq!(Intensity::new(5).unwrap().value(), 5);
    }

    #[test]
    fn intensity_deserialization_validates() {
        assert!(serde_json::from_str::<Intensity>("4").is_ok());
        assert!(serde_json::from_str::<Intensity>("9").is_err());
    }

    #[test]
    fn log_stamps_cycle_day_and_phase() {
        let mut log = SymptomLog::new();
        let p = profile(Some(date(2024, 3, 1)), 28);
        let entry = log.log_symptom(&p, date(2024, 3, 20), Symptom::Bloating, Intensity::new(4).unwrap(), "");
        assert_eq!(entry.cycle_day, Some(20));
        assert_eq!(entry.phase, Phase::Luteal);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn log_uses_profile_cycle_length() {
        let mut log = SymptomLog::new();
        // Day 16 of a 35-day cycle is still follicular (ends at 17)
        let p = profile(Some(date(2024, 3, 1)), 35);
        let entry = log.log_symptom(&p, date(2024, 3, 16), Symptom::Acne, Intensity::default(), "");
        assert_eq!(entry.phase, Phase::Follicular);
    }

    #[test]
    fn entries_keep_their_snapshot_after_profile_changes() {
        let mut log = SymptomLog::new();
        let mut p = profile(Some(date(2024, 3, 1)), 28);
        log.log_symptom(&p, date(2024, 3, 3), Symptom::Cramps, Intensity::new(5).unwrap(), "");

        p.last_period_date = Some(date(2024, 2, 10));
        p.cycle_length = 35;

        assert_eq!(log.entries()[0].cycle_day, Some(3));
        assert_eq!(log.entries()[0].phase, Phase::Menstrual);
    }

    #[test]
    fn missing_last_period_gives_unknown_phase() {
        let mut log = SymptomLog::new();
        let p = profile(None, 28);
        let entry = log.log_symptom(&p, date(2024, 3, 3), Symptom::Fatigue, Intensity::new(2).unwrap(), "");
        assert_eq!(entry.cycle_day, None);
        assert_eq!(entry.phase, Phase::Unknown);
    }

    #[test]
    fn recent_is_newest_first_and_summary_in_log_order() {
        let mut log = SymptomLog::new();
        let p = profile(Some(date(2024, 3, 1)), 28);
        for (symptom, level) in [
            (Symptom::Acne, 1),
            (Symptom::Cramps, 4),
            (Symptom::Headache, 2),
            (Symptom::Anxiety, 3),
        ] {
            log.log_symptom(&p, date(2024, 3, 5), symptom, Intensity::new(level).unwrap(), "");
        }

        let recent: Vec<_> = log.recent(3).map(|e| e.symptom.clone()).collect();
        assert_eq!(recent, vec![Symptom::Anxiety, Symptom::Headache, Symptom::Cramps]);
        assert_eq!(
            log.recent_summary(3),
            "Cramps (intensity: 4), Headache (intensity: 2), Anxiety (intensity: 3)"
        );
    }

    #[test]
    fn empty_log_summary_says_so() {
        assert_eq!(SymptomLog::new().recent_summary(3), "No recent symptoms logged.");
    }
}
