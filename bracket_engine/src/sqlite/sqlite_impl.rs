//! `SqliteDatabase` is a concrete implementation of a bracket engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements [`MatchRepository`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, matches, new_pool};
use crate::{
    config::EngineConfig,
    db_types::{Match, NewMatch},
    traits::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch, MatchRepository, MatchRepositoryError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl MatchRepository for SqliteDatabase {
    async fn find_matches(&self, filter: MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let result = matches::find_matches(filter, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_match(&self, id: i64) -> Result<Option<Match>, MatchRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let result = matches::fetch_match(id, &mut conn).await?;
        Ok(result)
    }

    async fn update_match(&self, id: i64, patch: MatchPatch) -> Result<Match, MatchRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let updated =
            matches::update_match(id, patch, &mut conn).await?.ok_or(MatchRepositoryError::MatchNotFound(id))?;
        debug!("🗃️ Match {updated} updated");
        Ok(updated)
    }

    async fn compare_and_set(&self, op: CompareAndSet) -> Result<u64, MatchRepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let description = op.to_string();
        let changed = matches::compare_and_set(op, &mut conn).await?;
        trace!("🗃️ Compare-and-set {description} changed {changed} slot(s)");
        Ok(changed)
    }

    /// Inserts all matches in a single atomic transaction. Records whose external id already exists for the
    /// competition are skipped.
    async fn insert_many(&self, new_matches: Vec<NewMatch>) -> Result<InsertMatchesResult, MatchRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = matches::insert_many(new_matches, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Bulk insert complete. {} matches inserted, {} already existed",
            result.inserted_count(),
            result.skipped_count()
        );
        Ok(result)
    }

    async fn close(&mut self) -> Result<(), MatchRepositoryError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the configured database URL and connection limit.
    pub async fn new() -> Result<Self, sqlx::Error> {
        let config = EngineConfig::from_env_or_default();
        SqliteDatabase::new_with_url(db_url().as_str(), config.max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// The URL of the database
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
