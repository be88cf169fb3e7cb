use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Match, NewMatch, Slot},
    events::SlotResolvedEvent,
};

/// The knockout skeleton for a competition, before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPlan {
    /// Name of the first knockout round. Empty if there is nothing to play.
    pub first_round: String,
    /// Every knockout match, first round first. The third-place match directly precedes the final.
    pub matches: Vec<NewMatch>,
}

impl BracketPlan {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn round(&self, stage: &str) -> Vec<&NewMatch> {
        self.matches.iter().filter(|m| m.stage == stage).collect()
    }

    /// The distinct stage names in the plan, in the order they are played.
    pub fn stages(&self) -> Vec<&str> {
        let mut stages: Vec<&str> = Vec::new();
        for m in &self.matches {
            if !stages.contains(&m.stage.as_str()) {
                stages.push(m.stage.as_str());
            }
        }
        stages
    }
}

/// A pending "replace `expected` with `value`" write for one slot of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub match_id: i64,
    pub stage: String,
    pub slot: Slot,
    pub expected: String,
    pub value: String,
}

/// A substitution that the repository confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResolution {
    pub match_id: i64,
    pub stage: String,
    pub slot: Slot,
    pub placeholder: String,
    pub team: String,
}

impl SlotResolution {
    pub fn to_event(&self, competition_id: &str) -> SlotResolvedEvent {
        SlotResolvedEvent {
            competition_id: competition_id.to_string(),
            match_id: self.match_id,
            stage: self.stage.clone(),
            slot: self.slot,
            placeholder: self.placeholder.clone(),
            team: self.team.clone(),
        }
    }
}

impl From<Substitution> for SlotResolution {
    fn from(s: Substitution) -> Self {
        Self { match_id: s.match_id, stage: s.stage, slot: s.slot, placeholder: s.expected, team: s.value }
    }
}

/// What one run of the placeholder cascade changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub resolved: Vec<SlotResolution>,
    /// Knockout matches that were played to a draw. Nobody advances from these.
    pub undecided: Vec<i64>,
}

impl ResolutionSummary {
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_no_op(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResult {
    #[serde(rename = "match")]
    pub updated: Match,
    pub resolution: ResolutionSummary,
}
