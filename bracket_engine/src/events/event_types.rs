use serde::{Deserialize, Serialize};

use crate::db_types::Slot;

/// A placeholder in a knockout match was replaced by a team name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResolvedEvent {
    pub competition_id: String,
    pub match_id: i64,
    pub stage: String,
    pub slot: Slot,
    pub placeholder: String,
    pub team: String,
}

/// The knockout skeleton of a competition was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketGeneratedEvent {
    pub competition_id: String,
    pub first_round: String,
    /// Number of matches created by this generation run. Zero when the bracket already existed.
    pub inserted: usize,
}
