//! Cycle day arithmetic and phase classification.
//!
//! Both functions are pure: callers pass `today` explicitly so that results
//! are reproducible in tests and stable within a single request.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Cycle length used when none is configured.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Length of the menstrual phase in days.
const MENSTRUAL_DAYS: u32 = 5;

/// Days after the follicular phase counted as ovulatory.
const OVULATORY_DAYS: u32 = 3;

/// Resolves the cycle length to use for calculations.
///
/// A missing or zero length falls back to `default_length`, and a zero
/// `default_length` falls back to [`DEFAULT_CYCLE_LENGTH`].
pub fn effective_cycle_length(cycle_length: Option<u32>, default_length: u32) -> u32 {
    match cycle_length {
        Some(len) if len > 0 => len,
        _ if default_length > 0 => default_length,
        _ => DEFAULT_CYCLE_LENGTH,
    }
}

/// Current 1-based day within the cycle.
///
/// Returns `None` when the last period date is unknown. Dates before the last
/// period wrap backwards, so the result is always in `[1, cycle_length]`.
pub fn cycle_day(today: NaiveDate, last_period: Option<NaiveDate>, cycle_length: u32) -> Option<u32> {
    let last_period = last_period?;
    let length = i64::from(effective_cycle_length(Some(cycle_length), DEFAULT_CYCLE_LENGTH));
    let days_since = (today - last_period).num_days();
    // rem_euclid keeps the result non-negative and below `length`
    Some(days_since.rem_euclid(length) as u32 + 1)
}

/// Phase of the menstrual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Menstrual Phase")]
    Menstrual,
    #[serde(rename = "Follicular Phase")]
    Follicular,
    #[serde(rename = "Ovulatory Phase")]
    Ovulatory,
    #[serde(rename = "Luteal Phase")]
    Luteal,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Menstrual,
        Phase::Follicular,
        Phase::Ovulatory,
        Phase::Luteal,
        Phase::Unknown,
    ];

    /// Human-readable label, e.g. "Luteal Phase".
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Menstrual => "Menstrual Phase",
            Phase::Follicular => "Follicular Phase",
            Phase::Ovulatory => "Ovulatory Phase",
            Phase::Luteal => "Luteal Phase",
            Phase::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = ValidationError;

    /// Accepts both the full label ("Luteal Phase") and the bare name ("luteal").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let name = normalized.strip_suffix(" phase").unwrap_or(&normalized);
        match name {
            "menstrual" => Ok(Phase::Menstrual),
            "follicular" => Ok(Phase::Follicular),
            "ovulatory" => Ok(Phase::Ovulatory),
            "luteal" => Ok(Phase::Luteal),
            "unknown" => Ok(Phase::Unknown),
            _ => Err(ValidationError::InvalidValue {
                field: "phase".to_string(),
                message: format!("unrecognized phase '{s}'"),
            }),
        }
    }
}

/// Classifies a cycle day into a phase.
///
/// Boundaries scale with `cycle_length`: the follicular phase ends at half the
/// cycle and the ovulatory window covers the following three days. Values
/// above `cycle_length` are not rejected and land in the luteal phase.
pub fn classify_phase(cycle_day: Option<u32>, cycle_length: u32) -> Phase {
    let Some(day) = cycle_day else {
        return Phase::Unknown;
    };

    let cycle_length = effective_cycle_length(Some(cycle_length), DEFAULT_CYCLE_LENGTH);
    let follicular_end = cycle_length / 2;
    let ovulatory_end = follicular_end + OVULATORY_DAYS;

    if (1..=MENSTRUAL_DAYS).contains(&day) {
        Phase::Menstrual
    } else if ((MENSTRUAL_DAYS + 1)..=follicular_end).contains(&day) {
        Phase::Follicular
    } else if day > follicular_end && day <= ovulatory_end {
        Phase::Ovulatory
    } else {
        Phase::Luteal
    }
}

/// Snapshot of where the user is in their cycle on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePosition {
    pub date: NaiveDate,
    pub cycle_day: Option<u32>,
    pub cycle_length: u32,
    pub phase: Phase,
}

impl CyclePosition {
    /// Computes the position for `today`.
    pub fn on(today: NaiveDate, last_period: Option<NaiveDate>, cycle_length: u32) -> Self {
        let cycle_length = effective_cycle_length(Some(cycle_length), DEFAULT_CYCLE_LENGTH);
        let day = cycle_day(today, last_period, cycle_length);
        Self {
            date: today,
            cycle_day: day,
            cycle_length,
            phase: classify_phase(day, cycle_length),
        }
    }

    /// Cycle day as display text, "Unknown" when not known.
    pub fn day_label(&self) -> String {
        format_cycle_day(self.cycle_day)
    }
}

/// Formats an optional cycle day for prompts and messages.
pub fn format_cycle_day(cycle_day: Option<u32>) -> String {
    cycle_day.map_or_else(|| "Unknown".to_string(), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cycle_day_is_unknown_without_last_period() {
        assert_eq!(cycle_day(date(2024, 3, 10), None, 28), None);
    }

    #[test]
    fn cycle_day_starts_at_one_on_period_start() {
        let start = date(2024, 3, 1);
        assert_eq!(cycle_day(start, Some(start), 28), Some(1));
        assert_eq!(cycle_day(date(2024, 3, 14), Some(start), 28), Some(14));
    }

    #[test]
    fn cycle_day_wraps_after_cycle_length() {
        let start = date(2024, 3, 1);
        assert_eq!(cycle_day(date(2024, 3, 29), Some(start), 28), Some(1));
        assert_eq!(cycle_day(date(2024, 3, 31), Some(start), 30), Some(1));
    }

    #[test]
    fn cycle_day_before_last_period_wraps_backwards() {
        let start = date(2024, 3, 10);
        // One day before the start is the last day of the previous cycle.
        assert_eq!(cycle_day(date(2024, 3, 9), Some(start), 28), Some(28));
    }

    #[test]
    fn zero_cycle_length_uses_default() {
        let start = date(2024, 3, 1);
        assert_eq!(cycle_day(date(2024, 3, 29), Some(start), 0), Some(1));
        assert_eq!(effective_cycle_length(None, 30), 30);
        assert_eq!(effective_cycle_length(Some(0), 0), DEFAULT_CYCLE_LENGTH);
    }

    #[test]
    fn classifies_reference_days_for_28_day_cycle() {
        assert_eq!(classify_phase(Some(3), 28), Phase::Menstrual);
        assert_eq!(classify_phase(Some(14), 28), Phase::Follicular);
        assert_eq!(classify_phase(Some(15), 28), Phase::Ovulatory);
        assert_eq!(classify_phase(Some(17), 28), Phase::Ovulatory);
        assert_eq!(classify_phase(Some(18), 28), Phase::Luteal);
        assert_eq!(classify_phase(Some(25), 28), Phase::Luteal);
    }

    #[test]
    fn boundaries_scale_with_cycle_length() {
        // follicular_end = 17, ovulatory_end = 20
        assert_eq!(classify_phase(Some(17), 35), Phase::Follicular);
        assert_eq!(classify_phase(Some(18), 35), Phase::Ovulatory);
        assert_eq!(classify_phase(Some(20), 35), Phase::Ovulatory);
        assert_eq!(classify_phase(Some(21), 35), Phase::Luteal);
    }

    #[test]
    fn unknown_day_is_unknown_phase() {
        assert_eq!(classify_phase(None, 28), Phase::Unknown);
    }

    #[test]
    fn day_past_cycle_length_is_luteal() {
        assert_eq!(classify_phase(Some(40), 28), Phase::Luteal);
    }

    #[test]
    fn phase_parses_labels_and_names() {
        assert_eq!("Luteal Phase".parse::<Phase>().unwrap(), Phase::Luteal);
        assert_eq!("follicular".parse::<Phase>().unwrap(), Phase::Follicular);
        assert_eq!("Unknown".parse::<Phase>().unwrap(), Phase::Unknown);
        assert!("spring".parse::<Phase>().is_err());
    }

    #[test]
    fn position_combines_day_and_phase() {
        let pos = CyclePosition::on(date(2024, 3, 17), Some(date(2024, 3, 1)), 28);
        assert_eq!(pos.cycle_day, Some(17));
        assert_eq!(pos.phase, Phase::Ovulatory);
        assert_eq!(pos.day_label(), "17");

        let unknown = CyclePosition::on(date(2024, 3, 17), None, 28);
        assert_eq!(unknown.phase, Phase::Unknown);
        assert_eq!(unknown.day_label(), "Unknown");
    }
}
