use std::{fmt::Debug, sync::Arc};

use log::*;

use crate::{
    config::EngineConfig,
    db_types::GROUP_STAGE_MARKERS,
    standings::{compute_standings, rank_thirds, Clock, Standings, StandingsCache, SystemClock, ThirdPlaceCandidate},
    traits::{MatchFilter, MatchRepository, MatchRepositoryError},
};

/// `StandingsApi` computes group tables for a competition and keeps them in a [`StandingsCache`].
///
/// Clones share the cache, so an invalidation through one clone is seen by all of them.
pub struct StandingsApi<B, C = SystemClock> {
    db: B,
    cache: Arc<StandingsCache<C>>,
}

impl<B: Clone, C> Clone for StandingsApi<B, C> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), cache: Arc::clone(&self.cache) }
    }
}

impl<B, C> Debug for StandingsApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StandingsApi")
    }
}

impl<B> StandingsApi<B> {
    pub fn new(db: B) -> Self {
        Self::from_config(db, &EngineConfig::default())
    }

    pub fn from_config(db: B, config: &EngineConfig) -> Self {
        Self::with_cache(db, Arc::new(StandingsCache::new(config.standings_ttl)))
    }
}

impl<B, C> StandingsApi<B, C> {
    pub fn with_cache(db: B, cache: Arc<StandingsCache<C>>) -> Self {
        Self { db, cache }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn cache(&self) -> &StandingsCache<C> {
        &self.cache
    }
}

impl<B, C> StandingsApi<B, C>
where
    B: MatchRepository,
    C: Clock,
{
    /// Computes the standings straight from the repository, bypassing the cache.
    ///
    /// A competition without group matches yields empty standings.
    pub async fn compute_standings(&self, competition_id: &str) -> Result<Standings, MatchRepositoryError> {
        let filter = MatchFilter::for_competition(competition_id).with_stage_prefixes(GROUP_STAGE_MARKERS);
        let matches = self.db.find_matches(filter).await?;
        let standings = compute_standings(&matches);
        debug!("🏆️ Standings for {competition_id} computed from {} group matches", matches.len());
        Ok(standings)
    }

    /// Returns the cached standings for the competition, computing and caching them if necessary.
    pub async fn standings(&self, competition_id: &str) -> Result<Arc<Standings>, MatchRepositoryError> {
        if let Some(standings) = self.cache.get(competition_id).await {
            trace!("🏆️ Standings cache hit for {competition_id}");
            return Ok(standings);
        }
        let generation = self.cache.generation();
        let standings = Arc::new(self.compute_standings(competition_id).await?);
        self.cache.insert(competition_id, Arc::clone(&standings), generation).await;
        Ok(standings)
    }

    /// Drops the cached standings for one competition, or for all competitions if `competition_id` is `None`.
    ///
    /// Call this after any write that can change group results.
    pub async fn invalidate(&self, competition_id: Option<&str>) {
        self.cache.invalidate(competition_id).await;
        debug!("🏆️ Standings invalidated for {}", competition_id.unwrap_or("all competitions"));
    }

    /// Ranks the third-placed teams of every group.
    pub async fn third_place_ranking(
        &self,
        competition_id: &str,
    ) -> Result<Vec<ThirdPlaceCandidate>, MatchRepositoryError> {
        let standings = self.standings(competition_id).await?;
        Ok(rank_thirds(&standings))
    }
}
