use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::mentions::MentionLocator;
use crate::sentiment::{LlmScorer, RuleScorer, SentimentScorer};
use crate::store::SentimentStore;

/// Runtime-tunable parameters (admins can modify at runtime).
#[derive(Debug, Clone)]
pub struct PulseConfig {
    /// Score with the chat model instead of the indicator rules.
    pub use_llm: bool,
    /// Default threshold for `/pulse shifts`.
    pub min_shift: f64,
    /// Threshold for the shift section of `/pulse report`.
    pub report_min_shift: f64,
    /// Max transcripts per `/pulse analyze` run.
    pub batch_limit: Option<usize>,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            use_llm: false,
            min_shift: 0.3,
            report_min_shift: 0.25,
            batch_limit: None,
        }
    }
}

pub struct AppState {
    pub store: Arc<SentimentStore>,
    pub locator: Arc<MentionLocator>,
    pub rules: Arc<RuleScorer>,
    pub llm_scorer: Arc<LlmScorer>,
    pub transcripts_dir: PathBuf,
    pub report_teams: Vec<String>,
    pub admin_ids: HashSet<u64>,
    pub pulse_config: Arc<RwLock<PulseConfig>>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    pub fn scorer(&self, use_llm: bool) -> Arc<dyn SentimentScorer> {
        if use_llm {
            self.llm_scorer.clone()
        } else {
            self.rules.clone()
        }
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
