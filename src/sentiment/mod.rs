pub mod indicators;
pub mod llm;
pub mod rules;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use indicators::IndicatorSet;
pub use llm::LlmScorer;
pub use rules::RuleScorer;

/// Scores above this are positive, scores below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Positive
        } else if score < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output shared by every scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// In `[-1, 1]`.
    pub score: f64,
    pub label: SentimentLabel,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub indicators: Vec<String>,
}

/// Scores one mention context. The player name is a hint; rule scoring ignores it.
pub trait SentimentScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score<'a>(
        &'a self,
        context: &'a str,
        player_name: &'a str,
    ) -> BoxFuture<'a, SentimentScore>;
}
