use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::roster::{title_case, RosterIndex};

/// Contexts shorter than this pull in their neighbouring sentences.
const SHORT_CONTEXT_CHARS: usize = 100;
const MAX_CONTEXT_CHARS: usize = 500;
/// Prefix of the context that takes part in duplicate detection.
const DEDUP_PREFIX_CHARS: usize = 100;

/// One located occurrence of a tracked player in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Canonical, title-cased name.
    pub player_name: String,
    pub team: String,
    pub context: String,
    /// Char offset of the match in the transcript.
    pub position: usize,
}

/// Finds roster names in transcripts. Patterns are compiled once per roster.
pub struct MentionLocator {
    roster: RosterIndex,
    sentence_split: Regex,
    patterns: Vec<Regex>,
}

impl MentionLocator {
    pub fn new(roster: RosterIndex) -> Result<Self> {
        let patterns = roster
            .entries()
            .iter()
            .map(|e| {
                Regex::new(&format!(r"\b{}\b", regex::escape(&e.ident)))
                    .with_context(|| format!("Bad name pattern for '{}'", e.ident))
            })
            .collect::<Result<Vec<_>>>()?;
        let sentence_split = Regex::new(r"[.!?]+").context("Bad sentence pattern")?;
        Ok(Self {
            roster,
            sentence_split,
            patterns,
        })
    }

    /// Every distinct player mention, in roster order then transcript order.
    pub fn locate(&self, transcript: &str) -> Vec<Mention> {
        let sentences: Vec<&str> = self.sentence_split.split(transcript).collect();
        let lower = transcript.to_lowercase();

        let mut mentions = Vec::new();
        for (entry, pattern) in self.roster.entries().iter().zip(&self.patterns) {
            for m in pattern.find_iter(&lower) {
                let position = lower[..m.start()].chars().count();
                let context = context_for(&sentences, position);
                mentions.push(Mention {
                    player_name: title_case(self.roster.canonical(entry)),
                    team: entry.team.clone(),
                    context,
                    position,
                });
            }
        }

        let found = mentions.len();
        let mut seen = HashSet::new();
        mentions.retain(|m| {
            let prefix: String = m.context.chars().take(DEDUP_PREFIX_CHARS).collect();
            seen.insert((m.player_name.clone(), prefix))
        });
        debug!(found, unique = mentions.len(), "mentions located");
        mentions
    }
}

/// Index of the sentence holding char offset `position`.
///
/// Each unit is counted with one separator char, even where the separator run was longer.
fn sentence_at(sentences: &[&str], position: usize) -> Option<usize> {
    let mut chars_seen = 0;
    for (i, sentence) in sentences.iter().enumerate() {
        chars_seen += sentence.chars().count() + 1;
        if chars_seen > position {
            return Some(i);
        }
    }
    None
}

fn context_for(sentences: &[&str], position: usize) -> String {
    let Some(idx) = sentence_at(sentences, position) else {
        return String::new();
    };

    let mut context = sentences[idx].trim().to_string();
    if context.chars().count() < SHORT_CONTEXT_CHARS {
        let prev = idx
            .checked_sub(1)
            .map(|i| sentences[i].trim())
            .filter(|s| !s.is_empty());
        if let Some(prev) = prev {
            context = format!("{}. {}", prev, context);
        }
        let next = sentences
            .get(idx + 1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        if let Some(next) = next {
            context = format!("{}. {}", context, next);
        }
    }

    context.chars().take(MAX_CONTEXT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(teams: &[(&str, &[&str])]) -> MentionLocator {
        let rosters: Vec<(String, Vec<String>)> = teams
            .iter()
            .map(|(t, ps)| (t.to_string(), ps.iter().map(|p| p.to_string()).collect()))
            .collect();
        MentionLocator::new(RosterIndex::build(&rosters)).unwrap()
    }

    #[test]
    fn test_full_and_alias_match_collapse_to_one_mention() {
        let loc = locator(&[("Boston Celtics", &["Jayson Tatum"])]);
        let mentions = loc.locate("Jayson Tatum played great tonight. He really stepped up.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].player_name, "Jayson Tatum");
        assert_eq!(mentions[0].team, "Boston Celtics");
        assert_eq!(
            mentions[0].context,
            "Jayson Tatum played great tonight. He really stepped up"
        );
        assert_eq!(mentions[0].position, 0);
    }

    #[test]
    fn test_alias_only_match_resolves_full_name() {
        let loc = locator(&[("Golden State Warriors", &["Steve Kerr"])]);
        let mentions = loc.locate("We talked to Kerr after the game.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].player_name, "Steve Kerr");
        assert_eq!(mentions[0].position, 13);
    }

    #[test]
    fn test_whole_word_only() {
        let loc = locator(&[("Golden State Warriors", &["Draymond Green"])]);
        assert!(loc.locate("The greenroom was packed. Greens everywhere.").is_empty());
        assert_eq!(loc.locate("Green was the difference.").len(), 1);
    }

    #[test]
    fn test_short_context_pulls_neighbours() {
        let loc = locator(&[("Miami Heat", &["Tyler Herro"])]);
        let mentions = loc.locate("First half was slow. Herro hit shots! Then we closed it out? Done.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(
            mentions[0].context,
            "First half was slow. Herro hit shots. Then we closed it out"
        );
    }

    #[test]
    fn test_long_context_is_not_extended_and_is_truncated() {
        let loc = locator(&[("Miami Heat", &["Tyler Herro"])]);
        let long = format!("Herro {}", "really ".repeat(100));
        let transcript = format!("Intro. {}. Outro.", long);
        let mentions = loc.locate(&transcript);
        assert_eq!(mentions.len(), 1);
        assert!(mentions[0].context.starts_with("Herro really"));
        assert_eq!(mentions[0].context.chars().count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn test_same_sentence_repeat_is_deduplicated() {
        let loc = locator(&[("Dallas Mavericks", &["Luka Doncic"])]);
        let mentions = loc.locate("Doncic passed to Doncic? No. Luka Doncic again somewhere else entirely.");
        let found: Vec<(&str, &str, usize)> = mentions
            .iter()
            .map(|m| (m.player_name.as_str(), m.context.as_str(), m.position))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Luka Doncic", "No. Luka Doncic again somewhere else entirely", 29),
                ("Luka Doncic", "Doncic passed to Doncic. No", 0),
            ]
        );
    }

    #[test]
    fn test_locate_is_deterministic() {
        let loc = locator(&[
            ("Boston Celtics", &["Jayson Tatum", "Jaylen Brown"]),
            ("Miami Heat", &["Jimmy Butler"]),
        ]);
        let text = "Brown and Tatum were great. Butler struggled. Tatum again.";
        assert_eq!(loc.locate(text), loc.locate(text));
    }

    #[test]
    fn test_no_names_no_mentions() {
        let loc = locator(&[("Boston Celtics", &["Jayson Tatum"])]);
        assert!(loc.locate("We just have to be better.").is_empty());
        assert!(loc.locate("").is_empty());
    }

    #[test]
    fn test_sentence_at_out_of_range() {
        assert_eq!(sentence_at(&["abc"], 10), None);
        assert_eq!(context_for(&["abc"], 10), "");
    }
}
