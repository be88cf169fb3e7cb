use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stage label prefixes that mark a match as belonging to the group stage.
pub const GROUP_STAGE_MARKERS: [&str; 2] = ["Grupo ", "Group "];
pub const FINAL_STAGE: &str = "Final";
pub const THIRD_PLACE_STAGE: &str = "Third-place";

/// Returns true if the stage label denotes a group-stage match, e.g. `Grupo A` or `Group B`.
pub fn is_group_stage(stage: &str) -> bool {
    GROUP_STAGE_MARKERS.iter().any(|m| stage.starts_with(m))
}

/// Strips the group-stage marker from a group label, so that `Grupo A` becomes `A`.
///
/// Labels without a marker are returned unchanged.
pub fn group_code(stage: &str) -> &str {
    GROUP_STAGE_MARKERS.iter().find_map(|m| stage.strip_prefix(m)).unwrap_or(stage).trim()
}

//--------------------------------------        Slot         ---------------------------------------------------------
/// One of the two team positions in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Home,
    Away,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::Home, Slot::Away];

    pub fn other(self) -> Self {
        match self {
            Slot::Home => Slot::Away,
            Slot::Away => Slot::Home,
        }
    }

    /// The team column backing this slot.
    pub fn team_column(self) -> &'static str {
        match self {
            Slot::Home => "home_team",
            Slot::Away => "away_team",
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Home => write!(f, "home"),
            Slot::Away => write!(f, "away"),
        }
    }
}

//--------------------------------------    MatchOutcome     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// At least one score is missing.
    Pending,
    /// Both scores are present and equal. Nobody advances from a drawn knockout match.
    Undecided,
    Decided { winner: Slot },
}

//--------------------------------------        Match        ---------------------------------------------------------
/// A stored match, group stage or knockout.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub competition_id: String,
    pub stage: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub sequence: i64,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn team(&self, slot: Slot) -> &str {
        match slot {
            Slot::Home => self.home_team.as_str(),
            Slot::Away => self.away_team.as_str(),
        }
    }

    pub fn team_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Home => &mut self.home_team,
            Slot::Away => &mut self.away_team,
        }
    }

    pub fn score(&self, slot: Slot) -> Option<i64> {
        match slot {
            Slot::Home => self.home_score,
            Slot::Away => self.away_score,
        }
    }

    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn is_group_stage(&self) -> bool {
        is_group_stage(&self.stage)
    }

    pub fn outcome(&self) -> MatchOutcome {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) if h > a => MatchOutcome::Decided { winner: Slot::Home },
            (Some(h), Some(a)) if h < a => MatchOutcome::Decided { winner: Slot::Away },
            (Some(_), Some(_)) => MatchOutcome::Undecided,
            _ => MatchOutcome::Pending,
        }
    }

    /// The winning and losing team names, if the match has a decisive result.
    pub fn winner_and_loser(&self) -> Option<(&str, &str)> {
        match self.outcome() {
            MatchOutcome::Decided { winner } => Some((self.team(winner), self.team(winner.other()))),
            _ => None,
        }
    }
}

impl Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let score = |s: Option<i64>| s.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "[{}] {} #{}: {} {}:{} {}",
            self.id,
            self.stage,
            self.sequence,
            self.home_team,
            score(self.home_score),
            score(self.away_score),
            self.away_team
        )
    }
}

//--------------------------------------      NewMatch       ---------------------------------------------------------
/// A match that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub competition_id: String,
    pub stage: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub sequence: i64,
    /// Stable key used to make bulk inserts idempotent. Unique per competition.
    pub external_id: Option<String>,
}

impl NewMatch {
    pub fn new(
        competition_id: impl Into<String>,
        stage: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        sequence: i64,
    ) -> Self {
        Self {
            competition_id: competition_id.into(),
            stage: stage.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score: None,
            away_score: None,
            sequence,
            external_id: None,
        }
    }

    pub fn with_score(mut self, home: i64, away: i64) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    pub fn with_external_id<S: Into<String>>(mut self, external_id: S) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn played(home: Option<i64>, away: Option<i64>) -> Match {
        let now = Utc::now();
        Match {
            id: 1,
            competition_id: "copa".into(),
            stage: "Semifinals".into(),
            home_team: "Brasil".into(),
            away_team: "Chile".into(),
            home_score: home,
            away_score: away,
            sequence: 1,
            external_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn group_labels() {
        assert!(is_group_stage("Grupo A"));
        assert!(is_group_stage("Group H"));
        assert!(!is_group_stage("Quarterfinals"));
        assert!(!is_group_stage("grupo A"));
        assert_eq!(group_code("Grupo A"), "A");
        assert_eq!(group_code("Group L"), "L");
        assert_eq!(group_code("Final"), "Final");
    }

    #[test]
    fn outcomes() {
        assert_eq!(played(None, Some(1)).outcome(), MatchOutcome::Pending);
        assert_eq!(played(Some(1), Some(1)).outcome(), MatchOutcome::Undecided);
        assert_eq!(played(Some(2), Some(1)).outcome(), MatchOutcome::Decided { winner: Slot::Home });
        assert_eq!(played(Some(0), Some(3)).winner_and_loser(), Some(("Chile", "Brasil")));
        assert_eq!(played(Some(2), Some(2)).winner_and_loser(), None);
    }
}
