pub mod tables;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Team name -> ordered player full names.
pub type Rosters = Vec<(String, Vec<String>)>;

/// One lookup entry of the roster index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Lower-cased full name or last-name alias.
    pub ident: String,
    pub team: String,
    pub is_alias: bool,
}

/// Lower-cased player identifier -> team lookup.
///
/// Entries keep registration order: for each team in roster order, each player's
/// full name followed by their last-name alias. An alias is only registered when
/// nothing else claims that identifier yet, so the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    entries: Vec<RosterEntry>,
    by_ident: HashMap<String, usize>,
}

impl RosterIndex {
    pub fn build(rosters: &[(String, Vec<String>)]) -> Self {
        let mut index = Self::default();
        for (team, players) in rosters {
            for player in players {
                let full = player.trim().to_lowercase();
                if full.is_empty() {
                    continue;
                }
                index.register_full(&full, team);

                if let Some(last) = full.split_whitespace().last() {
                    if !index.by_ident.contains_key(last) {
                        index.push(last.to_string(), team, true);
                    }
                }
            }
        }
        debug!(entries = index.entries.len(), "roster index built");
        index
    }

    /// Full names always (re)claim their identifier; a repeat keeps its original slot.
    fn register_full(&mut self, full: &str, team: &str) {
        match self.by_ident.get(full) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.team = team.to_string();
                entry.is_alias = false;
            }
            None => self.push(full.to_string(), team, false),
        }
    }

    fn push(&mut self, ident: String, team: &str, is_alias: bool) {
        self.by_ident.insert(ident.clone(), self.entries.len());
        self.entries.push(RosterEntry {
            ident,
            team: team.to_string(),
            is_alias,
        });
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Canonical lower-cased name for a matched identifier.
    ///
    /// Aliases resolve to the first full name (in registration order) on the same
    /// team that ends with the alias and is longer than it.
    pub fn canonical<'a>(&'a self, entry: &'a RosterEntry) -> &'a str {
        if !entry.is_alias {
            return &entry.ident;
        }
        self.entries
            .iter()
            .find(|e| {
                e.team == entry.team
                    && e.ident.len() > entry.ident.len()
                    && e.ident.ends_with(entry.ident.as_str())
            })
            .map(|e| e.ident.as_str())
            .unwrap_or(&entry.ident)
    }
}

/// On-disk roster snapshot, as written by the roster refresh job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub rosters: serde_json::Map<String, serde_json::Value>,
}

/// Load rosters from a JSON snapshot. Teams keep file order.
pub fn load_rosters(path: &Path) -> Result<Rosters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file {:?}", path))?;
    let file: RosterFile = serde_json::from_str(&text).context("Failed to parse roster JSON")?;

    let mut rosters = Vec::with_capacity(file.rosters.len());
    for (team, players) in file.rosters {
        let players: Vec<String> = serde_json::from_value(players)
            .with_context(|| format!("Malformed player list for {}", team))?;
        rosters.push((team, players));
    }

    info!(
        teams = rosters.len(),
        updated_at = file.updated_at.as_deref().unwrap_or("unknown"),
        "Roster file loaded"
    );
    Ok(rosters)
}

/// Roster from `path` when it exists and holds any team, built-in table otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<Rosters> {
    if let Some(path) = path {
        if !path.exists() {
            warn!(path = ?path, "Roster file not found, using built-in rosters");
            return Ok(tables::default_rosters());
        }
        let rosters = load_rosters(path)?;
        if !rosters.is_empty() {
            return Ok(rosters);
        }
    }
    Ok(tables::default_rosters())
}

/// First known coach whose name appears in the video title or description.
pub fn extract_coach_name(title: &str, description: &str) -> Option<&'static str> {
    let text = format!("{} {}", title, description).to_lowercase();
    tables::COACHES
        .iter()
        .find(|coach| text.contains(&coach.to_lowercase()))
        .copied()
}

/// `"jayson tatum"` -> `"Jayson Tatum"`, `"d'angelo"` -> `"D'Angelo"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for ch in s.chars() {
        if prev_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_cased = ch.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(teams: &[(&str, &[&str])]) -> Rosters {
        teams
            .iter()
            .map(|(t, ps)| (t.to_string(), ps.iter().map(|p| p.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_alias_first_registration_wins() {
        let index = RosterIndex::build(&roster(&[
            ("Golden State Warriors", &["Draymond Green"]),
            ("Dallas Mavericks", &["Josh Green"]),
        ]));
        let idents: Vec<(&str, &str, bool)> = index
            .entries()
            .iter()
            .map(|e| (e.ident.as_str(), e.team.as_str(), e.is_alias))
            .collect();
        assert_eq!(
            idents,
            vec![
                ("draymond green", "Golden State Warriors", false),
                ("green", "Golden State Warriors", true),
                ("josh green", "Dallas Mavericks", false),
            ]
        );
    }

    #[test]
    fn test_alias_resolves_to_same_team_full_name() {
        let index = RosterIndex::build(&roster(&[("Golden State Warriors", &["Steve Kerr"])]));
        let alias = index.entries().iter().find(|e| e.ident == "kerr").unwrap();
        assert!(alias.is_alias);
        assert_eq!(index.canonical(alias), "steve kerr");
    }

    #[test]
    fn test_full_name_reclaims_alias_slot() {
        let index = RosterIndex::build(&roster(&[
            ("A", &["Bob Nene"]),
            ("B", &["Nene"]),
        ]));
        let entry = index.entries().iter().find(|e| e.ident == "nene").unwrap();
        assert!(!entry.is_alias);
        assert_eq!(entry.team, "B");
    }

    #[test]
    fn test_alias_shared_on_team_resolves_to_first_registered() {
        let index = RosterIndex::build(&roster(&[(
            "Oklahoma City Thunder",
            &["Jalen Williams", "Jaylin Williams"],
        )]));
        let alias = index.entries().iter().find(|e| e.ident == "williams").unwrap();
        assert!(alias.is_alias);
        assert_eq!(index.canonical(alias), "jalen williams");

        let locator = crate::mentions::MentionLocator::new(index).unwrap();
        let mentions = locator.locate("Williams scored.");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].player_name, "Jalen Williams");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jayson tatum"), "Jayson Tatum");
        assert_eq!(title_case("d'angelo russell"), "D'Angelo Russell");
        assert_eq!(title_case("kentavious caldwell-pope"), "Kentavious Caldwell-Pope");
        assert_eq!(title_case("dereck lively ii"), "Dereck Lively Ii");
    }

    #[test]
    fn test_extract_coach_name() {
        assert_eq!(
            extract_coach_name("Joe Mazzulla postgame press conference", ""),
            Some("Joe Mazzulla")
        );
        assert_eq!(extract_coach_name("Highlights", "steve kerr talks"), Some("Steve Kerr"));
        assert_eq!(extract_coach_name("Top 10 dunks", ""), None);
    }

    #[test]
    fn test_load_rosters_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosters.json");
        std::fs::write(
            &path,
            r#"{"updated_at":"2025-01-01T00:00:00","rosters":{"Zeta":["A B"],"Alpha":["C D"]}}"#,
        )
        .unwrap();
        let rosters = load_rosters(&path).unwrap();
        assert_eq!(rosters[0].0, "Zeta");
        assert_eq!(rosters[1].1, vec!["C D".to_string()]);
    }

    #[test]
    fn test_empty_roster_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosters.json");
        std::fs::write(&path, r#"{"rosters":{}}"#).unwrap();
        let rosters = load_or_default(Some(&path)).unwrap();
        assert_eq!(rosters.len(), tables::default_rosters().len());
    }

    #[test]
    fn test_missing_roster_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nba_rosters.json");
        let rosters = load_or_default(Some(&path)).unwrap();
        assert_eq!(rosters, tables::default_rosters());
    }
}
