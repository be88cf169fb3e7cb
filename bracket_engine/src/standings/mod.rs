//! # Group standings
//!
//! * [`compute_standings`] reduces group-stage matches into ranked tables.
//! * [`rank_thirds`] compares the third-placed teams of all groups, for brackets that take the best thirds.
//! * [`StandingsCache`] memoizes computed tables per competition for a limited time.
mod cache;
mod calculator;
mod third_place;

pub use cache::{Clock, ManualClock, StandingsCache, SystemClock};
pub use calculator::{compute_standings, ranking_order, Standings, StandingsEntry, POINTS_FOR_DRAW, POINTS_FOR_WIN};
pub use third_place::{rank_thirds, ThirdPlaceCandidate};
