//! Statistics module for Blossom
//!
//! This module provides analytics over the symptom log: phase/symptom
//! pattern detection and the aggregates behind the trend dashboard.

mod patterns;
mod trends;

pub use patterns::{phase_symptom_means, PatternAnalyzer, PatternReport, PhaseSymptomMean};

pub use trends::{
    cycle_day_frequency, intensity_timeline, CycleDayCell, TimelinePoint, TrendReport, Trends,
};
