use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sentiment::SentimentLabel;
use crate::store::types::SentimentRecord;
use crate::store::SentimentStore;

/// Records considered per player, most recent first.
const TREND_WINDOW: usize = 100;
/// Leading records that count as "recent".
const RECENT_WINDOW: usize = 5;
const TREND_THRESHOLD: f64 = 0.2;
const LATEST_CONTEXT_CHARS: usize = 200;
const FAVORITE_THRESHOLD: f64 = 0.3;
const WATCH_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    fn from_diff(diff: f64) -> Self {
        if diff > TREND_THRESHOLD {
            Self::Improving
        } else if diff < -TREND_THRESHOLD {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestMention {
    pub date: String,
    pub score: f64,
    pub label: SentimentLabel,
    pub context: String,
    pub coach: String,
}

/// Derived view over a player's records; always reproducible by re-aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub player_name: String,
    pub mention_count: usize,
    pub avg_sentiment: f64,
    pub recent_avg: f64,
    pub older_avg: f64,
    pub trend: Trend,
    pub trend_magnitude: f64,
    pub latest_mentions: Vec<LatestMention>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub player_name: String,
    pub mention_count: usize,
    pub avg_sentiment: f64,
    pub sentiment_category: SentimentLabel,
    pub last_mentioned: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: String,
    pub total_players_mentioned: usize,
    pub players: Vec<PlayerStanding>,
    pub coach_favorites: Vec<String>,
    pub players_to_watch: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub player_name: String,
    pub trend: Trend,
    pub magnitude: f64,
    pub recent_avg: f64,
    pub older_avg: f64,
    pub mention_count: usize,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn mean(xs: &[f64]) -> Option<f64> {
    (!xs.is_empty()).then(|| xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Newest date first; same-date records keep insertion order.
fn newest_first(a: &SentimentRecord, b: &SentimentRecord) -> Ordering {
    b.date.cmp(&a.date).then(a.seq.cmp(&b.seq))
}

/// Trend over the player's 100 most recent records. `None` when there are none.
pub fn compute_trend(player_name: &str, records: &[SentimentRecord]) -> Option<TrendSummary> {
    let mut rows: Vec<&SentimentRecord> = records
        .iter()
        .filter(|r| r.player_name == player_name)
        .collect();
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| newest_first(a, b));
    rows.truncate(TREND_WINDOW);

    let scores: Vec<f64> = rows.iter().map(|r| r.sentiment_score).collect();
    let avg = mean(&scores)?;
    let split = RECENT_WINDOW.min(scores.len());
    let recent_avg = mean(&scores[..split]).unwrap_or(0.0);
    let older_avg = mean(&scores[split..]).unwrap_or(recent_avg);
    let diff = recent_avg - older_avg;

    Some(TrendSummary {
        player_name: player_name.to_string(),
        mention_count: rows.len(),
        avg_sentiment: round3(avg),
        recent_avg: round3(recent_avg),
        older_avg: round3(older_avg),
        trend: Trend::from_diff(diff),
        trend_magnitude: round3(diff.abs()),
        latest_mentions: rows
            .iter()
            .take(RECENT_WINDOW)
            .map(|r| LatestMention {
                date: r.date.clone(),
                score: r.sentiment_score,
                label: r.sentiment_label,
                context: r.context.chars().take(LATEST_CONTEXT_CHARS).collect(),
                coach: r.coach_name.clone(),
            })
            .collect(),
    })
}

/// Per-player standings for a team. `None` when the team has no records.
pub fn team_report(team: &str, records: &[SentimentRecord]) -> Option<TeamReport> {
    let mut by_player: HashMap<&str, Vec<&SentimentRecord>> = HashMap::new();
    for r in records.iter().filter(|r| r.team == team) {
        by_player.entry(r.player_name.as_str()).or_default().push(r);
    }
    if by_player.is_empty() {
        return None;
    }

    let mut standings: Vec<(f64, PlayerStanding)> = by_player
        .into_iter()
        .map(|(player, rows)| {
            let scores: Vec<f64> = rows.iter().map(|r| r.sentiment_score).collect();
            let avg = mean(&scores).unwrap_or(0.0);
            let last = rows.iter().map(|r| r.date.as_str()).max().unwrap_or_default();
            let standing = PlayerStanding {
                player_name: player.to_string(),
                mention_count: rows.len(),
                avg_sentiment: round3(avg),
                sentiment_category: SentimentLabel::from_score(avg),
                last_mentioned: last.to_string(),
            };
            (avg, standing)
        })
        .collect();
    standings.sort_by(|(a, pa), (b, pb)| {
        b.total_cmp(a).then_with(|| pa.player_name.cmp(&pb.player_name))
    });
    let players: Vec<PlayerStanding> = standings.into_iter().map(|(_, p)| p).collect();

    let coach_favorites = players
        .iter()
        .filter(|p| p.avg_sentiment > FAVORITE_THRESHOLD)
        .map(|p| p.player_name.clone())
        .collect();
    let players_to_watch = players
        .iter()
        .filter(|p| p.avg_sentiment < WATCH_THRESHOLD)
        .map(|p| p.player_name.clone())
        .collect();

    Some(TeamReport {
        team: team.to_string(),
        total_players_mentioned: players.len(),
        players,
        coach_favorites,
        players_to_watch,
    })
}

/// Players whose trend magnitude reaches `min_shift`, largest shift first.
pub fn find_shifts(records: &[SentimentRecord], min_shift: f64) -> Vec<Shift> {
    let mut players: Vec<&str> = records.iter().map(|r| r.player_name.as_str()).collect();
    players.sort_unstable();
    players.dedup();

    let mut shifts: Vec<Shift> = players
        .into_iter()
        .filter_map(|player| compute_trend(player, records))
        .filter(|t| t.trend_magnitude >= min_shift)
        .map(|t| Shift {
            player_name: t.player_name,
            trend: t.trend,
            magnitude: t.trend_magnitude,
            recent_avg: t.recent_avg,
            older_avg: t.older_avg,
            mention_count: t.mention_count,
        })
        .collect();
    shifts.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    shifts
}

pub async fn player_trend(
    store: &SentimentStore,
    player_name: &str,
) -> Result<Option<TrendSummary>> {
    let records = store.records_for_player(player_name).await?;
    debug!(player = player_name, records = records.len(), "computing trend");
    Ok(compute_trend(player_name, &records))
}

pub async fn team_standings(store: &SentimentStore, team: &str) -> Result<Option<TeamReport>> {
    let records = store.records_for_team(team).await?;
    Ok(team_report(team, &records))
}

pub async fn sentiment_shifts(store: &SentimentStore, min_shift: f64) -> Result<Vec<Shift>> {
    let records = store.all_records().await?;
    Ok(find_shifts(&records, min_shift))
}

/// Plain-text digest: notable shifts, then favorites and watch list per team.
pub async fn generate_report(
    store: &SentimentStore,
    teams: &[String],
    min_shift: f64,
) -> Result<String> {
    let records = store.all_records().await?;
    Ok(render_report(&records, teams, min_shift))
}

fn render_report(records: &[SentimentRecord], teams: &[String], min_shift: f64) -> String {
    let mut out = String::from("COACH SENTIMENT REPORT\n\nNOTABLE SENTIMENT SHIFTS\n");

    let shifts = find_shifts(records, min_shift);
    if shifts.is_empty() {
        out.push_str("No significant shifts detected\n");
    }
    for shift in shifts.iter().take(10) {
        let _ = writeln!(
            out,
            "{} {}: {}\n   Recent: {:+.2} | Before: {:+.2}",
            if shift.trend == Trend::Improving { "▲" } else { "▼" },
            shift.player_name,
            shift.trend.to_string().to_uppercase(),
            shift.recent_avg,
            shift.older_avg,
        );
    }

    out.push_str("\nTEAM SENTIMENT SUMMARIES\n");
    let or_none = |names: &[String]| {
        if names.is_empty() {
            "None detected".to_string()
        } else {
            names.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        }
    };
    for team in teams {
        let Some(report) = team_report(team, records) else {
            continue;
        };
        let _ = writeln!(
            out,
            "\n{}\n  Coach favorites: {}\n  Watch list: {}",
            team,
            or_none(&report.coach_favorites),
            or_none(&report.players_to_watch),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(player: &str, team: &str, date: &str, score: f64, seq: u64) -> SentimentRecord {
        SentimentRecord {
            video_id: format!("v{}", seq),
            player_name: player.to_string(),
            team: team.to_string(),
            coach_name: "Coach".to_string(),
            date: date.to_string(),
            context: format!("context {} {}", player, "x".repeat(250)),
            sentiment_score: score,
            sentiment_label: SentimentLabel::from_score(score),
            confidence: 0.5,
            indicators: vec![],
            analyzed_at: String::new(),
            seq,
        }
    }

    #[test]
    fn test_trend_no_data() {
        assert!(compute_trend("Nobody", &[]).is_none());
    }

    #[test]
    fn test_three_records_are_stable() {
        let records = vec![
            rec("A", "T", "2025-01-01", 0.9, 0),
            rec("A", "T", "2025-01-02", -0.9, 1),
            rec("A", "T", "2025-01-03", 0.3, 2),
        ];
        let t = compute_trend("A", &records).unwrap();
        assert_eq!(t.mention_count, 3);
        assert_eq!(t.recent_avg, t.older_avg);
        assert_eq!(t.trend, Trend::Stable);
        assert_eq!(t.trend_magnitude, 0.0);
        assert_eq!(t.avg_sentiment, 0.1);
        assert_eq!(t.latest_mentions[0].date, "2025-01-03");
        assert_eq!(t.latest_mentions[0].context.chars().count(), 200);
    }

    #[test]
    fn test_recent_window_improving() {
        let mut records: Vec<_> = (0..5)
            .map(|i| rec("A", "T", &format!("2025-01-0{}", i + 1), -0.5, i))
            .collect();
        records.extend((0..5).map(|i| rec("A", "T", &format!("2025-02-0{}", i + 1), 0.5, 10 + i)));
        let t = compute_trend("A", &records).unwrap();
        assert_eq!(t.recent_avg, 0.5);
        assert_eq!(t.older_avg, -0.5);
        assert_eq!(t.trend, Trend::Improving);
        assert_eq!(t.trend_magnitude, 1.0);
    }

    #[test]
    fn test_same_date_ties_use_insertion_order() {
        let records = vec![
            rec("A", "T", "2025-01-01", 0.1, 7),
            rec("A", "T", "2025-01-01", 0.2, 3),
        ];
        let t = compute_trend("A", &records).unwrap();
        assert_eq!(t.latest_mentions[0].score, 0.2);
        assert_eq!(t.latest_mentions[1].score, 0.1);
    }

    #[test]
    fn test_trend_window_caps_at_hundred() {
        let records: Vec<_> = (0..120)
            .map(|i| rec("A", "T", &format!("2025-01-{:02}", i % 28 + 1), 0.0, i))
            .collect();
        assert_eq!(compute_trend("A", &records).unwrap().mention_count, 100);
    }

    #[test]
    fn test_team_report_categories() {
        let records = vec![
            rec("Fav", "Celtics", "2025-01-01", 0.8, 0),
            rec("Fav", "Celtics", "2025-01-05", 0.6, 1),
            rec("Meh", "Celtics", "2025-01-02", 0.1, 2),
            rec("Bad", "Celtics", "2025-01-03", -0.7, 3),
            rec("Other", "Heat", "2025-01-03", -0.7, 4),
        ];
        let report = team_report("Celtics", &records).unwrap();
        assert_eq!(report.total_players_mentioned, 3);
        let names: Vec<_> = report.players.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(names, vec!["Fav", "Meh", "Bad"]);
        assert_eq!(report.players[0].mention_count, 2);
        assert_eq!(report.players[0].last_mentioned, "2025-01-05");
        assert_eq!(report.players[0].sentiment_category, SentimentLabel::Positive);
        assert_eq!(report.players[1].sentiment_category, SentimentLabel::Neutral);
        assert_eq!(report.coach_favorites, vec!["Fav"]);
        assert_eq!(report.players_to_watch, vec!["Bad"]);
        assert!(team_report("Lakers", &records).is_none());
    }

    #[test]
    fn test_find_shifts_sorted_and_filtered() {
        let mut records = Vec::new();
        let mut seq = 0;
        for (player, old, new) in [("Small", 0.0, 0.3), ("Big", -0.8, 0.8), ("Flat", 0.2, 0.2)] {
            for day in 1..=5 {
                records.push(rec(player, "T", &format!("2025-01-0{}", day), old, seq));
                seq += 1;
            }
            for day in 1..=5 {
                records.push(rec(player, "T", &format!("2025-02-0{}", day), new, seq));
                seq += 1;
            }
        }
        let shifts = find_shifts(&records, 0.25);
        let names: Vec<_> = shifts.iter().map(|s| s.player_name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Small"]);
        assert_eq!(shifts[0].magnitude, 1.6);
        assert_eq!(shifts[1].trend, Trend::Improving);
        assert!(find_shifts(&records, 2.0).is_empty());
    }

    #[test]
    fn test_render_report() {
        let mut records = Vec::new();
        for day in 1..=6 {
            let score = if day == 1 { -0.9 } else { 0.9 };
            records.push(rec("Star", "Celtics", &format!("2025-01-0{}", day), score, day));
        }
        let text = render_report(&records, &["Celtics".to_string(), "Lakers".to_string()], 0.25);
        assert!(text.contains("▲ Star: IMPROVING"));
        assert!(text.contains("Recent: +0.90 | Before: -0.90"));
        assert!(text.contains("Coach favorites: Star"));
        assert!(text.contains("Watch list: None detected"));
        assert!(!text.contains("Lakers"));
    }
}
