use futures::future::{BoxFuture, FutureExt};

use super::{IndicatorSet, SentimentLabel, SentimentScore, SentimentScorer};

const NEUTRAL_CONFIDENCE: f64 = 0.3;
const NO_INDICATORS: &str = "no clear indicators";

/// Keyword scorer over a fixed indicator vocabulary.
#[derive(Debug, Clone, Default)]
pub struct RuleScorer {
    indicators: IndicatorSet,
}

impl RuleScorer {
    pub fn new(indicators: IndicatorSet) -> Self {
        Self { indicators }
    }

    pub fn score_context(&self, context: &str) -> SentimentScore {
        let lower = context.to_lowercase();
        let matching = |list: &[String]| -> Vec<String> {
            list.iter()
                .filter(|phrase| lower.contains(phrase.as_str()))
                .cloned()
                .collect()
        };

        let positive = matching(&self.indicators.positive);
        let negative = matching(&self.indicators.negative);

        if positive.is_empty() && negative.is_empty() {
            let mut neutral = matching(&self.indicators.neutral);
            if neutral.is_empty() {
                neutral.push(NO_INDICATORS.to_string());
            }
            return SentimentScore {
                score: 0.0,
                label: SentimentLabel::Neutral,
                confidence: NEUTRAL_CONFIDENCE,
                indicators: neutral,
            };
        }

        let pos = positive.len() as f64;
        let neg = negative.len() as f64;
        let total = pos + neg + 0.001;
        let score = ((pos - neg) / total).clamp(-1.0, 1.0);

        let mut indicators = positive;
        indicators.extend(negative);

        SentimentScore {
            score,
            label: SentimentLabel::from_score(score),
            confidence: (0.4 + 0.1 * total).min(0.9),
            indicators,
        }
    }
}

impl SentimentScorer for RuleScorer {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn score<'a>(
        &'a self,
        context: &'a str,
        _player_name: &'a str,
    ) -> BoxFuture<'a, SentimentScore> {
        futures::future::ready(self.score_context(context)).boxed()
    }
}
