use std::fmt::Debug;

use log::*;

use crate::{
    bracket_api::{bracket_objects::RecordedResult, errors::BracketApiError, standings_api::StandingsApi},
    events::EventProducers,
    standings::{Clock, SystemClock},
    traits::{MatchPatch, MatchRepository},
};

/// `BracketApi` is the primary API for the knockout stage. It generates the bracket skeleton, records results, and
/// cascades resolved team names into the placeholder slots of later rounds.
pub struct BracketApi<B, C = SystemClock> {
    pub(crate) db: B,
    pub(crate) standings: StandingsApi<B, C>,
    pub(crate) producers: EventProducers,
}

impl<B, C> Debug for BracketApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BracketApi")
    }
}

impl<B: Clone> BracketApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        let standings = StandingsApi::new(db.clone());
        Self { db, standings, producers }
    }
}

impl<B: Clone, C> BracketApi<B, C> {
    /// Creates a bracket API that shares its standings cache with `standings`.
    pub fn with_standings(standings: StandingsApi<B, C>, producers: EventProducers) -> Self {
        let db = standings.db().clone();
        Self { db, standings, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn standings(&self) -> &StandingsApi<B, C> {
        &self.standings
    }
}

impl<B, C> BracketApi<B, C>
where
    B: MatchRepository,
    C: Clock,
{
    /// Records the final score of a match, then runs the placeholder cascade for its competition.
    ///
    /// Slots that were already resolved are never rewritten, so correcting a score after the cascade has used it
    /// does not move the teams that already advanced.
    pub async fn record_result(
        &self,
        match_id: i64,
        home_score: i64,
        away_score: i64,
    ) -> Result<RecordedResult, BracketApiError> {
        if home_score < 0 || away_score < 0 {
            return Err(BracketApiError::InvalidScore(home_score, away_score));
        }
        let updated = self.db.update_match(match_id, MatchPatch::score(home_score, away_score)).await?;
        info!("🔗️ Result recorded: {updated}");
        self.standings.invalidate(Some(&updated.competition_id)).await;
        let resolution = self.resolve_downstream(&updated.competition_id).await?;
        Ok(RecordedResult { updated, resolution })
    }
}
