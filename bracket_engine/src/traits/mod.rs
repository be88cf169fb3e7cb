//! # Storage contracts
//!
//! This module defines the interface contract that storage *backends* must implement to host the bracket engine.
//!
//! A backend stores [`Match`](crate::db_types::Match) records, keyed by competition. Group-stage matches carry a group
//! label (`Grupo A`, `Group B`) as their stage, knockout matches a round label (`Quarterfinals`, `Final`). Knockout
//! matches start out holding placeholder tokens in their team slots, which the engine later replaces with real team
//! names.
//!
//! * [`MatchRepository`] defines query, patch, compare-and-set and bulk-insert behaviour.
mod data_objects;
mod match_repository;

pub use data_objects::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch};
pub use match_repository::{MatchRepository, MatchRepositoryError};
