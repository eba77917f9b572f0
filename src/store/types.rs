use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

/// Blake3 hex hash of `(video_id, player_name, context)`.
pub type RecordId = String;

/// One scored mention, persisted once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub video_id: String,
    pub player_name: String,
    pub team: String,
    pub coach_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub context: String,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub confidence: f64,
    pub indicators: Vec<String>,
    /// RFC 3339
    pub analyzed_at: String,
    /// Insertion order, assigned by the store.
    #[serde(default)]
    pub seq: u64,
}

impl SentimentRecord {
    /// Identity key. Inserting a second record with the same id is a no-op.
    pub fn id(&self) -> RecordId {
        let mut hasher = blake3::Hasher::new();
        for part in [&self.video_id, &self.player_name, &self.context] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
