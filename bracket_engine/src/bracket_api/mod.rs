//! # Bracket engine public API
//!
//! The `bracket_api` module exposes the programmatic API for the bracket engine.
//!
//! * [`standings_api`] computes group tables and keeps them in a TTL cache.
//! * [`bracket_flow_api`] is the primary API for the knockout stage. It generates the bracket skeleton (see
//!   [`generator`]), records results and runs the placeholder cascade (see [`resolver`]).
//!
//! The other submodules in this module are support types.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements [`MatchRepository`].
//!
//! ```rust,ignore
//! use bracket_engine::{BracketApi, EventProducers, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/brackets.db", 5).await?;
//! let api = BracketApi::new(db, EventProducers::default());
//! api.generate_bracket("copa-2024", 2, "copa-2024").await?;
//! let recorded = api.record_result(17, 2, 1).await?;
//! ```
//!
//! [`MatchRepository`]: crate::traits::MatchRepository

pub mod bracket_flow_api;
pub mod bracket_objects;
pub mod errors;
pub mod generator;
pub mod resolver;
pub mod standings_api;

pub use bracket_flow_api::BracketApi;
pub use bracket_objects::{BracketPlan, RecordedResult, ResolutionSummary, SlotResolution, Substitution};
pub use errors::BracketApiError;
pub use generator::plan_bracket;
pub use standings_api::StandingsApi;
