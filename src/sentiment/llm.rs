use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{RuleScorer, SentimentLabel, SentimentScore, SentimentScorer};
use crate::llm::LlmClient;

const MAX_TOKENS: u32 = 300;

/// Delegates scoring to a chat model and falls back to `RuleScorer` on any failure.
pub struct LlmScorer {
    llm: Arc<LlmClient>,
    fallback: RuleScorer,
}

#[derive(Debug, Deserialize)]
struct ModelVerdict {
    sentiment_score: f64,
    sentiment_label: String,
    confidence: f64,
    #[serde(default)]
    indicators: Vec<String>,
}

impl LlmScorer {
    pub fn new(llm: Arc<LlmClient>, fallback: RuleScorer) -> Self {
        Self { llm, fallback }
    }

    async fn ask(&self, context: &str, player_name: &str) -> Result<SentimentScore> {
        let prompt = build_prompt(context, player_name);
        let response = self.llm.complete(&prompt, MAX_TOKENS).await?;
        debug!(player = player_name, response_len = response.len(), "model verdict received");
        parse_verdict(&response)
    }
}

impl SentimentScorer for LlmScorer {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn score<'a>(
        &'a self,
        context: &'a str,
        player_name: &'a str,
    ) -> BoxFuture<'a, SentimentScore> {
        async move {
            match self.ask(context, player_name).await {
                Ok(score) => score,
                Err(e) => {
                    warn!(player = player_name, "LLM scoring failed, falling back to rules: {:#}", e);
                    self.fallback.score_context(context)
                }
            }
        }
        .boxed()
    }
}

fn build_prompt(context: &str, player_name: &str) -> String {
    format!(
        r#"Analyze the following excerpt from an NBA coach's press conference about {player}.

Context: "{context}"

Determine the coach's sentiment toward {player}. Consider:
1. Is the coach praising or criticizing the player's performance?
2. Are there hints about future playing time (positive or negative)?
3. Is the coach expressing confidence or concern?
4. What specific phrases indicate the sentiment?

Respond in this exact JSON format:
{{
    "sentiment_score": <float from -1.0 (very negative) to 1.0 (very positive)>,
    "sentiment_label": "<positive|negative|neutral>",
    "confidence": <float from 0.0 to 1.0>,
    "indicators": ["<phrase 1>", "<phrase 2>"]
}}

Only output the JSON, nothing else."#,
        player = player_name,
        context = context,
    )
}

/// Pull the JSON object out of a model reply, tolerating code fences and chatter.
fn extract_json(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    (end > start).then(|| &input[start..=end])
}

fn parse_verdict(response: &str) -> Result<SentimentScore> {
    let json = extract_json(response).context("No JSON object in model reply")?;
    let verdict: ModelVerdict =
        serde_json::from_str(json).context("Malformed sentiment JSON")?;

    let label = match verdict.sentiment_label.trim().to_lowercase().as_str() {
        "positive" => SentimentLabel::Positive,
        "negative" => SentimentLabel::Negative,
        "neutral" => SentimentLabel::Neutral,
        other => bail!("Unknown sentiment label '{}'", other),
    };
    if !verdict.sentiment_score.is_finite() || !verdict.confidence.is_finite() {
        bail!("Non-finite score or confidence");
    }

    Ok(SentimentScore {
        score: verdict.sentiment_score.clamp(-1.0, 1.0),
        label,
        confidence: verdict.confidence.clamp(0.0, 1.0),
        indicators: verdict.indicators,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let reply = r#"{"sentiment_score": 0.8, "sentiment_label": "positive", "confidence": 0.7, "indicators": ["stepped up"]}"#;
        let s = parse_verdict(reply).unwrap();
        assert_eq!(s.label, SentimentLabel::Positive);
        assert_eq!(s.score, 0.8);
        assert_eq!(s.indicators, vec!["stepped up"]);
    }

    #[test]
    fn test_parse_fenced_json_and_clamp() {
        let reply = "Sure:\n```json\n{\"sentiment_score\": -3, \"sentiment_label\": \"Negative\", \"confidence\": 2, \"indicators\": []}\n```";
        let s = parse_verdict(reply).unwrap();
        assert_eq!(s.score, -1.0);
        assert_eq!(s.confidence, 1.0);
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_parse_rejects_bad_replies() {
        assert!(parse_verdict("I cannot help with that").is_err());
        assert!(parse_verdict(r#"{"sentiment_score": 0.1}"#).is_err());
        assert!(parse_verdict(
            r#"{"sentiment_score": 0.1, "sentiment_label": "mixed", "confidence": 0.5}"#
        )
        .is_err());
    }

    #[test]
    fn test_prompt_names_player_and_context() {
        let prompt = build_prompt("He was great.", "Jayson Tatum");
        assert!(prompt.contains("about Jayson Tatum."));
        assert!(prompt.contains("Context: \"He was great.\""));
        assert!(prompt.contains("\"sentiment_label\""));
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back_to_rules() {
        let llm = LlmClient::new(
            "http://127.0.0.1:9/v1".to_string(),
            "none".to_string(),
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let scorer = LlmScorer::new(Arc::new(llm), RuleScorer::default());
        let context = "He struggled with turnovers and was not ready.";

        let s = scorer.score(context, "Somebody").await;
        assert_eq!(s, RuleScorer::default().score_context(context));
        assert_eq!(s.label, SentimentLabel::Negative);
    }
}
