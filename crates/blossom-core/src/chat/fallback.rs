use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Topics recognized by the keyword scan, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTopic {
    Fatigue,
    Anxiety,
    Pain,
}

impl KeywordTopic {
    /// Checked in this order; the first match wins.
    pub const PRIORITY: [KeywordTopic; 3] = [KeywordTopic::Fatigue, KeywordTopic::Anxiety, KeywordTopic::Pain];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordTopic::Fatigue => &["tired", "exhausted", "fatigue"],
            KeywordTopic::Anxiety => &["anxious", "anxiety", "worried"],
            KeywordTopic::Pain => &["cramps", "pain"],
        }
    }

    pub fn response(&self) -> &'static str {
        match self {
            KeywordTopic::Fatigue => "Fatigue can be common, especially during your luteal phase. Would you like some energy-boosting tips that align with your current cycle phase?",
            KeywordTopic::Anxiety => "I notice you're feeling anxious. This is common during hormonal fluctuations. Deep breathing or a short walk might help regulate your nervous system.",
            KeywordTopic::Pain => "I'm sorry you're experiencing pain. A warm compress and anti-inflammatory foods might provide some relief. Would you like more specific suggestions?",
        }
    }

    /// First topic whose keywords appear in `text`.
    ///
    /// Keywords are stored lowercase and the text is lowercased before the
    /// scan, so "EXHAUSTED" and "Exhausted" both select fatigue.
    pub fn detect(text: &str) -> Option<KeywordTopic> {
        let lowered = text.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|topic| topic.keywords().iter().any(|kw| lowered.contains(*kw)))
    }
}

/// General replies; `{cycle_day}` is substituted.
pub const FALLBACK_TEMPLATES: [&str; 4] = [
    "I understand how challenging hormonal symptoms can be. Based on your cycle day ({cycle_day}), this is normal. How can I support you today?",
    "Thank you for sharing how you're feeling. Would you like some suggestions for managing these symptoms?",
    "I'm here to listen and help. Have you noticed any patterns with these symptoms?",
    "That sounds difficult. Many women experience similar challenges. Would gentle movement or stress reduction techniques help right now?",
];

/// Deterministic replies used when no language model is reachable.
pub struct FallbackResponder {
    rng: Mcg128Xsl64,
}

impl FallbackResponder {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { rng }
    }

    /// Keyword reply if a topic matches, otherwise a random template.
    pub fn respond(&mut self, input: &str, cycle_day: &str) -> String {
        if let Some(topic) = KeywordTopic::detect(input) {
            return topic.response().to_string();
        }
        let template = FALLBACK_TEMPLATES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_TEMPLATES[1]);
        template.replace("{cycle_day}", cycle_day)
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(None)
    }
}
