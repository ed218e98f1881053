//! Chart-ready projections of the symptom log.
//!
//! Nothing here renders; the aggregates are handed to whatever draws the
//! intensity timeline, per-phase bars and cycle-day heatmap.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patterns::{phase_symptom_means, PhaseSymptomMean};
use crate::storage::DashboardConfig;
use crate::symptoms::{Symptom, SymptomEntry};

/// One point on the intensity-over-time chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub symptom: Symptom,
    pub intensity: u8,
}

/// Count of a symptom on a given cycle day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDayCell {
    pub cycle_day: u32,
    pub symptom: Symptom,
    pub count: usize,
}

/// All dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub timeline: Vec<TimelinePoint>,
    pub phase_means: Vec<PhaseSymptomMean>,
    pub cycle_day_frequency: Vec<CycleDayCell>,
}

/// Dashboard state for the current log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendReport {
    /// Not enough entries yet; `remaining` more are needed.
    Locked { remaining: usize },
    Ready(Trends),
}

impl TrendReport {
    pub fn build(entries: &[SymptomEntry], config: &DashboardConfig) -> Self {
        if entries.len() < config.min_entries {
            return TrendReport::Locked {
                remaining: config.min_entries - entries.len(),
            };
        }
        TrendReport::Ready(Trends::compute(entries))
    }
}

impl Trends {
    pub fn compute(entries: &[SymptomEntry]) -> Self {
        Self {
            timeline: intensity_timeline(entries),
            phase_means: phase_symptom_means(entries),
            cycle_day_frequency: cycle_day_frequency(entries),
        }
    }
}

/// Intensity points sorted by date; same-day points keep log order.
pub fn intensity_timeline(entries: &[SymptomEntry]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = entries
        .iter()
        .map(|e| TimelinePoint {
            date: e.date,
            symptom: e.symptom.clone(),
            intensity: e.intensity.value(),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Symptom counts per cycle day. Entries with an unknown cycle day are skipped.
pub fn cycle_day_frequency(entries: &[SymptomEntry]) -> Vec<CycleDayCell> {
    let mut counts: BTreeMap<(u32, String), (Symptom, usize)> = BTreeMap::new();
    for entry in entries {
        let Some(day) = entry.cycle_day else {
            continue;
        };
        counts
            .entry((day, entry.symptom.name().to_string()))
            .or_insert_with(|| (entry.symptom.clone(), 0))
            .1 += 1;
    }

    counts
        .into_iter()
        .map(|((cycle_day, _), (symptom, count))| CycleDayCell {
            cycle_day,
            symptom,
            count,
        })
        .collect()
}
