//! Canned wellness insights.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// The insight pool. Not data-driven.
pub const INSIGHTS: [&str; 5] = [
    "Your mood symptoms seem to intensify during the luteal phase. Magnesium-rich foods like dark chocolate might help.",
    "I notice your energy levels drop during menstruation. Gentle movement like walking or stretching could help maintain energy.",
    "Your bloating symptoms appear consistently before your period. Reducing salt intake and increasing water might help.",
    "You've reported headaches in your follicular phase. Ensuring adequate hydration may help reduce their frequency.",
    "Your sleep quality decreases before menstruation. A consistent bedtime routine might be beneficial.",
];

/// Picks insights uniformly at random from [`INSIGHTS`].
pub struct InsightGenerator {
    rng: Mcg128Xsl64,
}

impl InsightGenerator {
    /// Create a generator; `seed` makes the sequence reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { rng }
    }

    /// Generator for the insight that follows the `log_len`-th entry.
    ///
    /// A configured seed is offset by the log length so successive runs of a
    /// short-lived process do not repeat the same insight. The result is
    /// still reproducible for a given seed and log.
    pub fn for_log(seed: Option<u64>, log_len: usize) -> Self {
        Self::new(seed.map(|seed| seed.wrapping_add(log_len as u64)))
    }

    pub fn generate(&mut self) -> &'static str {
        INSIGHTS.choose(&mut self.rng).copied().unwrap_or(INSIGHTS[0])
    }

    /// Chat message wrapping an insight.
    pub fn message(&mut self) -> String {
        format!("**Blossom Insight**: {}", self.generate())
    }
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Whether the n-th logged entry should trigger an insight.
pub fn is_insight_due(log_len: usize, every_n_logs: usize) -> bool {
    every_n_logs > 0 && log_len > 0 && log_len % every_n_logs == 0
}
