use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::{Match, Slot};

/// Query criteria for [`MatchRepository::find_matches`](crate::MatchRepository::find_matches).
///
/// The competition id is always required. All other criteria are optional and are combined with `AND`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchFilter {
    pub competition_id: String,
    pub stage: Option<String>,
    /// Matches whose stage label starts with any of these prefixes.
    pub stage_prefixes: Option<Vec<String>>,
    /// Matches where either slot equals this value.
    pub team: Option<String>,
}

impl MatchFilter {
    pub fn for_competition<S: Into<String>>(competition_id: S) -> Self {
        Self { competition_id: competition_id.into(), ..Default::default() }
    }

    pub fn with_stage<S: Into<String>>(mut self, stage: S) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_stage_prefixes<S: Into<String>, I: IntoIterator<Item = S>>(mut self, prefixes: I) -> Self {
        self.stage_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_team<S: Into<String>>(mut self, team: S) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Returns true if the match satisfies every criterion in the filter.
    pub fn matches(&self, m: &Match) -> bool {
        if m.competition_id != self.competition_id {
            return false;
        }
        if let Some(stage) = &self.stage {
            if &m.stage != stage {
                return false;
            }
        }
        if let Some(prefixes) = &self.stage_prefixes {
            if !prefixes.iter().any(|p| m.stage.starts_with(p.as_str())) {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if &m.home_team != team && &m.away_team != team {
                return false;
            }
        }
        true
    }
}

/// A simple field patch for a single match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPatch {
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub sequence: Option<i64>,
}

impl MatchPatch {
    pub fn score(home: i64, away: i64) -> Self {
        Self { home_score: Some(home), away_score: Some(away), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.home_score.is_none() && self.away_score.is_none() && self.sequence.is_none()
    }
}

/// Replace the value of one team slot with `value`, but only where the slot still holds `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareAndSet {
    pub competition_id: String,
    pub stage: Option<String>,
    pub slot: Slot,
    pub expected: String,
    pub value: String,
}

impl CompareAndSet {
    pub fn new(
        competition_id: impl Into<String>,
        slot: Slot,
        expected: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            competition_id: competition_id.into(),
            stage: None,
            slot,
            expected: expected.into(),
            value: value.into(),
        }
    }

    pub fn in_stage<S: Into<String>>(mut self, stage: S) -> Self {
        self.stage = Some(stage.into());
        self
    }
}

impl Display for CompareAndSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} {} slot: '{}' -> '{}'",
            self.competition_id,
            self.stage.as_deref().unwrap_or("*"),
            self.slot,
            self.expected,
            self.value
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertMatchesResult {
    /// The records that were created by this call.
    pub inserted: Vec<Match>,
    /// The external ids that already existed and were skipped.
    pub skipped: Vec<String>,
}

impl InsertMatchesResult {
    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
