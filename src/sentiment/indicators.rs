use serde::{Deserialize, Serialize};

const POSITIVE: &[&str] = &[
    // performance praise
    "played great", "played well", "excellent", "fantastic", "amazing",
    "incredible", "outstanding", "tremendous", "phenomenal", "brilliant",
    "stepped up", "came through", "delivered", "dominated", "took over",
    // role / minutes
    "earned", "deserves", "trust", "confident in", "believe in",
    "going to play", "more minutes", "expanded role", "starting",
    "love what he", "love his", "really like", "impressed",
    // growth
    "improved", "getting better", "growing", "progressing", "developing",
    "matured", "evolved", "next level", "breakthrough",
    // intangibles
    "leader", "vocal", "sets the tone", "brings energy", "competitor",
    "professional", "works hard", "first one in", "dedicated",
    "great defense", "shot well", "efficient", "smart plays",
    "controlled the game", "made winning plays", "clutch",
];

const NEGATIVE: &[&str] = &[
    // performance criticism
    "struggled", "had a tough", "didn't play well", "off night",
    "not his best", "needs to be better", "got to do more",
    "unacceptable", "disappointed", "frustrating", "concerning",
    // role / minutes
    "won't play", "less minutes", "coming off bench", "reduced role",
    "not ready", "not there yet", "needs work", "has to earn",
    "look at other options", "evaluate", "figure out",
    // effort / attitude
    "focus", "concentration", "attention to detail", "discipline",
    "can't have", "not acceptable", "expect more", "demand more",
    // availability reads negative more often than not
    "day to day", "questionable", "dealing with", "managing",
    "turnovers", "defensive lapses", "shot selection", "forcing",
    "out of control", "decision making", "costly mistakes",
];

const NEUTRAL: &[&str] = &[
    "we'll see", "evaluate", "day by day", "game to game",
    "depends on", "matchup", "situation", "look at film",
];

/// Indicator phrases, matched as lower-case substrings of a mention context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl IndicatorSet {
    pub fn new(positive: &[&str], negative: &[&str], neutral: &[&str]) -> Self {
        let own = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_lowercase()).collect() };
        Self {
            positive: own(positive),
            negative: own(negative),
            neutral: own(neutral),
        }
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::new(POSITIVE, NEGATIVE, NEUTRAL)
    }
}
