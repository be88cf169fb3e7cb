use thiserror::Error;

use crate::{
    db_types::{Match, NewMatch},
    traits::data_objects::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch},
};

/// This trait defines the storage behaviour the bracket engine needs from a backend.
///
/// The engine treats the repository as the only source of truth. It never caches match records between calls (only
/// the derived standings are cached), so every operation must reflect the current state of the store.
///
/// Writes come in two flavours:
/// * [`update_match`](MatchRepository::update_match) is a plain patch of a single record, used to record results.
/// * [`compare_and_set`](MatchRepository::compare_and_set) rewrites a team slot only if it still holds an expected
///   placeholder token. Placeholder resolution relies exclusively on this form, which is what makes the cascade safe
///   to repeat and safe to run concurrently.
#[allow(async_fn_in_trait)]
pub trait MatchRepository: Clone {
    /// Fetches all matches satisfying the filter, ordered by stage, then sequence, then id.
    async fn find_matches(&self, filter: MatchFilter) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn fetch_match(&self, id: i64) -> Result<Option<Match>, MatchRepositoryError>;

    /// Applies the patch to the match with the given id and returns the updated record.
    ///
    /// ## Failure modes:
    /// - If the match does not exist, [`MatchRepositoryError::MatchNotFound`] is returned.
    async fn update_match(&self, id: i64, patch: MatchPatch) -> Result<Match, MatchRepositoryError>;

    /// Sets the team slot named in `op` to `op.value` on every match of the competition (and stage, if given) whose
    /// slot currently equals `op.expected`.
    ///
    /// Returns the number of slots that were rewritten. Zero is a normal result: it means another writer got there
    /// first, or the slot has already been resolved.
    async fn compare_and_set(&self, op: CompareAndSet) -> Result<u64, MatchRepositoryError>;

    /// Stores the matches in bulk.
    ///
    /// Matches carrying an `external_id` that already exists for their competition are skipped, so the call is
    /// idempotent for keyed records.
    async fn insert_many(&self, matches: Vec<NewMatch>) -> Result<InsertMatchesResult, MatchRepositoryError>;

    /// Closes the underlying connection(s).
    async fn close(&mut self) -> Result<(), MatchRepositoryError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum MatchRepositoryError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested match (id {0}) does not exist")]
    MatchNotFound(i64),
    #[error("The requested match update would result in a no-op.")]
    MatchModificationNoOp,
}

impl From<sqlx::Error> for MatchRepositoryError {
    fn from(e: sqlx::Error) -> Self {
        MatchRepositoryError::DatabaseError(e.to_string())
    }
}
