//! Phase/symptom pattern detection.
//!
//! Groups the symptom log by (phase, symptom), averages intensity per group
//! and surfaces the first group whose mean exceeds the threshold.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cycle::Phase;
use crate::storage::PatternConfig;
use crate::symptoms::{Symptom, SymptomEntry};

/// Mean intensity of one (phase, symptom) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSymptomMean {
    pub phase: Phase,
    pub symptom: Symptom,
    pub mean_intensity: f64,
    pub count: usize,
}

/// Outcome of a pattern analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatternReport {
    /// Fewer entries than the configured minimum.
    NotEnoughData { entries: usize, required: usize },
    /// A group with a high mean intensity.
    Found {
        phase: Phase,
        symptom: Symptom,
        mean_intensity: f64,
    },
    /// Enough data, nothing above the threshold yet.
    StillAnalyzing,
}

impl PatternReport {
    /// User-facing sentence.
    pub fn message(&self) -> String {
        match self {
            PatternReport::NotEnoughData { .. } => {
                "Not enough data to identify patterns yet.".to_string()
            }
            PatternReport::Found { phase, symptom, .. } => format!(
                "You tend to experience higher intensity {symptom} during your {phase}."
            ),
            PatternReport::StillAnalyzing => {
                "Still analyzing your patterns. Keep logging your symptoms!".to_string()
            }
        }
    }
}

impl fmt::Display for PatternReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Computes mean intensity per (phase, symptom) group.
///
/// Groups are ordered by phase label, then symptom name.
pub fn phase_symptom_means(entries: &[SymptomEntry]) -> Vec<PhaseSymptomMean> {
    let mut groups: BTreeMap<(&'static str, String), (Phase, Symptom, u32, usize)> = BTreeMap::new();

    for entry in entries {
        let key = (entry.phase.label(), entry.symptom.name().to_string());
        let group = groups
            .entry(key)
            .or_insert_with(|| (entry.phase, entry.symptom.clone(), 0, 0));
        group.2 += u32::from(entry.intensity.value());
        group.3 += 1;
    }

    groups
        .into_values()
        .map(|(phase, symptom, total, count)| PhaseSymptomMean {
            phase,
            symptom,
            mean_intensity: f64::from(total) / count as f64,
            count,
        })
        .collect()
}

/// Detects high-intensity phase/symptom pairs.
pub struct PatternAnalyzer {
    config: PatternConfig,
}

impl PatternAnalyzer {
    /// Create an analyzer with default thresholds.
    pub fn new() -> Self {
        Self {
            config: PatternConfig::default(),
        }
    }

    /// Create an analyzer with custom thresholds.
    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Analyzes the full log. Recomputed from scratch on every call.
    pub fn analyze(&self, entries: &[SymptomEntry]) -> PatternReport {
        if entries.len() < self.config.min_entries {
            return PatternReport::NotEnoughData {
                entries: entries.len(),
                required: self.config.min_entries,
            };
        }

        let report = phase_symptom_means(entries)
            .into_iter()
            .find(|group| group.mean_intensity > self.config.intensity_threshold)
            .map_or(PatternReport::StillAnalyzing, |group| PatternReport::Found {
                phase: group.phase,
                symptom: group.symptom,
                mean_intensity: group.mean_intensity,
            });

        tracing::debug!(entries = entries.len(), ?report, "pattern analysis");
        report
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symptoms::Intensity;
    use chrono::NaiveDate;

    fn entry(phase: Phase, symptom: Symptom, intensity: i64) -> SymptomEntry {
        SymptomEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            cycle_day: Some(1),
            phase,
            symptom,
            intensity: Intensity::new(intensity).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn fewer_than_three_entries_is_not_enough_data() {
        let analyzer = PatternAnalyzer::new();
        let entries = vec![
            entry(Phase::Luteal, Symptom::MoodSwings, 5),
            entry(Phase::Luteal, Symptom::MoodSwings, 5),
        ];
        let report = analyzer.analyze(&entries);
        assert_eq!(report, PatternReport::NotEnoughData { entries: 2, required: 3 });
        assert_eq!(report.message(), "Not enough data to identify patterns yet.");
        assert!(matches!(analyzer.analyze(&[]), PatternReport::NotEnoughData { .. }));
    }

    #[test]
    fn reports_high_intensity_group() {
        let entries = vec![
            entry(Phase::Luteal, Symptom::MoodSwings, 4),
            entry(Phase::Luteal, Symptom::MoodSwings, 5),
            entry(Phase::Follicular, Symptom::Headache, 2),
        ];
        let report = PatternAnalyzer::new().analyze(&entries);
        assert_eq!(
            report,
            PatternReport::Found {
                phase: Phase::Luteal,
                symptom: Symptom::MoodSwings,
                mean_intensity: 4.5,
            }
        );
        assert_eq!(
            report.message(),
            "You tend to experience higher intensity Mood swings during your Luteal Phase."
        );
    }

    #[test]
    fn mean_equal_to_threshold_does_not_qualify() {
        let entries = vec![
            entry(Phase::Luteal, Symptom::Cramps, 3),
            entry(Phase::Luteal, Symptom::Cramps, 3),
            entry(Phase::Menstrual, Symptom::Cramps, 2),
        ];
        assert_eq!(PatternAnalyzer::new().analyze(&entries), PatternReport::StillAnalyzing);
    }

    #[test]
    fn first_qualifying_group_in_label_order_wins() {
        let entries = vec![
            entry(Phase::Ovulatory, Symptom::Acne, 5),
            entry(Phase::Menstrual, Symptom::Cramps, 5),
            entry(Phase::Luteal, Symptom::Bloating, 4),
        ];
        // "Luteal Phase" sorts before "Menstrual Phase" and "Ovulatory Phase"
        let report = PatternAnalyzer::new().analyze(&entries);
        assert!(matches!(
            report,
            PatternReport::Found { phase: Phase::Luteal, symptom: Symptom::Bloating, .. }
        ));
    }

    #[test]
    fn threshold_is_configurable() {
        let analyzer = PatternAnalyzer::with_config(PatternConfig {
            min_entries: 1,
            intensity_threshold: 1.5,
        });
        let report = analyzer.analyze(&[entry(Phase::Follicular, Symptom::Headache, 2)]);
        assert!(matches!(report, PatternReport::Found { .. }));
    }

    #[test]
    fn means_are_grouped_and_counted() {
        let entries = vec![
            entry(Phase::Luteal, Symptom::MoodSwings, 4),
            entry(Phase::Follicular, Symptom::Headache, 2),
            entry(Phase::Luteal, Symptom::MoodSwings, 1),
        ];
        let means = phase_symptom_means(&entries);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].phase, Phase::Follicular);
        assert_eq!(means[1].count, 2);
        assert_eq!(means[1].mean_intensity, 2.5);
    }
}
