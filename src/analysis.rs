use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::mentions::MentionLocator;
use crate::roster::extract_coach_name;
use crate::sentiment::SentimentScorer;
use crate::store::types::SentimentRecord;
use crate::store::SentimentStore;

const UNKNOWN_COACH: &str = "Unknown";

/// A downloaded press-conference transcript, as written by the scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_name: String,
    /// ISO-8601
    pub published_at: String,
    #[serde(default)]
    pub coach_name: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}

impl TranscriptRecord {
    /// `YYYY-MM-DD` prefix of `published_at`.
    pub fn date(&self) -> Result<String> {
        let day = self
            .published_at
            .get(..10)
            .with_context(|| format!("published_at too short: '{}'", self.published_at))?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .with_context(|| format!("Bad publish date '{}'", self.published_at))?;
        Ok(day.to_string())
    }

    /// Declared coach, else one recognised in the title or description.
    pub fn coach(&self) -> String {
        self.coach_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| extract_coach_name(&self.title, &self.description))
            .unwrap_or(UNKNOWN_COACH)
            .to_string()
    }
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub mentions: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub fn load_transcript(path: &Path) -> Result<TranscriptRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed transcript {:?}", path))
}

/// Locate and score every player mention in one transcript.
pub async fn analyze_transcript(
    record: &TranscriptRecord,
    locator: &MentionLocator,
    scorer: &dyn SentimentScorer,
) -> Result<Vec<SentimentRecord>> {
    let transcript = match record.transcript.as_deref() {
        Some(t) if !t.trim().is_empty() => t,
        _ => bail!("Transcript missing for video {}", record.video_id),
    };
    let date = record.date()?;
    let coach_name = record.coach();

    let mentions = locator.locate(transcript);
    let mut results = Vec::with_capacity(mentions.len());
    for mention in mentions {
        let verdict = scorer.score(&mention.context, &mention.player_name).await;
        results.push(SentimentRecord {
            video_id: record.video_id.clone(),
            player_name: mention.player_name,
            team: mention.team,
            coach_name: coach_name.clone(),
            date: date.clone(),
            context: mention.context,
            sentiment_score: verdict.score,
            sentiment_label: verdict.label,
            confidence: verdict.confidence,
            indicators: verdict.indicators,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
            seq: 0,
        });
    }

    debug!(
        video_id = %record.video_id,
        channel = %record.channel_name,
        mentions = results.len(),
        scorer = scorer.name(),
        "transcript analyzed"
    );
    Ok(results)
}

/// `*.json` files in `dir`, sorted by file name.
pub fn transcript_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list transcripts in {:?}", dir))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Analyze and persist every transcript in `dir`. A bad file is logged and skipped.
pub async fn run_batch(
    dir: &Path,
    limit: Option<usize>,
    locator: &MentionLocator,
    scorer: &dyn SentimentScorer,
    store: &SentimentStore,
) -> Result<BatchSummary> {
    let mut files = transcript_files(dir)?;
    if let Some(limit) = limit {
        files.truncate(limit);
    }

    info!(count = files.len(), scorer = scorer.name(), "Analyzing transcripts");
    let mut summary = BatchSummary {
        files: files.len(),
        ..Default::default()
    };

    for (i, path) in files.iter().enumerate() {
        debug!(n = i + 1, of = files.len(), file = ?path.file_name(), "analyzing");

        let outcome = async {
            let record = load_transcript(path)?;
            let results = analyze_transcript(&record, locator, scorer).await?;
            let stored = store.insert_batch(&results).await?;
            anyhow::Ok((results.len(), stored))
        }
        .await;

        match outcome {
            Ok((mentions, stored)) => {
                summary.analyzed += 1;
                summary.mentions += mentions;
                summary.inserted += stored.inserted;
                summary.skipped += stored.skipped;
            }
            Err(e) => {
                summary.failed += 1;
                warn!(file = ?path, "Skipping transcript: {:#}", e);
            }
        }
    }

    info!(
        analyzed = summary.analyzed,
        failed = summary.failed,
        mentions = summary.mentions,
        inserted = summary.inserted,
        "Analysis complete"
    );
    Ok(summary)
}
