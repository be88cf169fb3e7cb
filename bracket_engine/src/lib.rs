//! Bracket Engine
//!
//! The Bracket Engine computes group-stage standings, generates the knockout bracket for a competition, and fills the
//! placeholder slots of knockout matches with real team names as results come in. It is storage-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Match storage ([`mod@traits`], [`mod@sqlite`], [`mod@memory`]). Backends implement [`MatchRepository`]. SQLite
//!    is the persistent backend; the in-memory backend is handy for tests and embedding. The record types live in
//!    [`mod@db_types`] and are public.
//! 2. The bracket engine public API ([`mod@bracket_api`]). [`StandingsApi`] computes and caches group tables, and
//!    [`BracketApi`] generates brackets, records results and runs the placeholder cascade.
//!
//! The engine also emits events that can be subscribed to, for example whenever a placeholder is replaced by a team
//! name. See [`mod@events`] for how to hook into them.
pub mod bracket_api;
pub mod config;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod memory;
pub mod standings;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;

pub use bracket_api::{
    bracket_objects,
    plan_bracket,
    BracketApi,
    BracketApiError,
    RecordedResult,
    ResolutionSummary,
    StandingsApi,
};
pub use config::EngineConfig;
pub use events::{EventHandlers, EventHooks, EventProducers};
pub use memory::InMemoryRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use standings::{ManualClock, Standings, StandingsEntry, SystemClock};
pub use traits::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch, MatchRepository, MatchRepositoryError};
