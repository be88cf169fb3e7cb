//! `InMemoryRepository` keeps matches in process memory and implements [`MatchRepository`].
//!
//! Clones share the same store. Every effective write (a patched record, a rewritten slot or an inserted record) is
//! counted, which lets callers check that a repeated operation wrote nothing.
use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::Utc;
use log::*;
use tokio::sync::RwLock;

use crate::{
    db_types::{Match, NewMatch},
    traits::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch, MatchRepository, MatchRepositoryError},
};

#[derive(Default)]
struct Store {
    next_id: i64,
    matches: BTreeMap<i64, Match>,
}

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
    writes: Arc<AtomicU64>,
}

impl Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InMemoryRepository ({} writes)", self.write_count())
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of effective writes made so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_writes(&self, n: u64) {
        self.writes.fetch_add(n, Ordering::SeqCst);
    }

    /// Returns every stored match, in id order.
    pub async fn all_matches(&self) -> Vec<Match> {
        self.store.read().await.matches.values().cloned().collect()
    }
}

impl MatchRepository for InMemoryRepository {
    async fn find_matches(&self, filter: MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let store = self.store.read().await;
        let mut result = store.matches.values().filter(|m| filter.matches(m)).cloned().collect::<Vec<_>>();
        result.sort_by(|a, b| (&a.stage, a.sequence, a.id).cmp(&(&b.stage, b.sequence, b.id)));
        Ok(result)
    }

    async fn fetch_match(&self, id: i64) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(self.store.read().await.matches.get(&id).cloned())
    }

    async fn update_match(&self, id: i64, patch: MatchPatch) -> Result<Match, MatchRepositoryError> {
        if patch.is_empty() {
            return Err(MatchRepositoryError::MatchModificationNoOp);
        }
        let mut store = self.store.write().await;
        let record = store.matches.get_mut(&id).ok_or(MatchRepositoryError::MatchNotFound(id))?;
        if let Some(score) = patch.home_score {
            record.home_score = Some(score);
        }
        if let Some(score) = patch.away_score {
            record.away_score = Some(score);
        }
        if let Some(sequence) = patch.sequence {
            record.sequence = sequence;
        }
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.record_writes(1);
        debug!("🗃️ Match {updated} updated");
        Ok(updated)
    }

    async fn compare_and_set(&self, op: CompareAndSet) -> Result<u64, MatchRepositoryError> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let mut changed = 0;
        let targets = store.matches.values_mut().filter(|m| {
            m.competition_id == op.competition_id &&
                op.stage.as_ref().map_or(true, |s| &m.stage == s) &&
                m.team(op.slot) == op.expected
        });
        for m in targets {
            *m.team_mut(op.slot) = op.value.clone();
            m.updated_at = now;
            changed += 1;
        }
        self.record_writes(changed);
        trace!("🗃️ Compare-and-set {op} changed {changed} slot(s)");
        Ok(changed)
    }

    async fn insert_many(&self, matches: Vec<NewMatch>) -> Result<InsertMatchesResult, MatchRepositoryError> {
        let mut store = self.store.write().await;
        let mut result = InsertMatchesResult::default();
        let now = Utc::now();
        for new_match in matches {
            if let Some(key) = &new_match.external_id {
                let exists = store
                    .matches
                    .values()
                    .any(|m| m.competition_id == new_match.competition_id && m.external_id.as_ref() == Some(key));
                if exists {
                    result.skipped.push(key.clone());
                    continue;
                }
            }
            store.next_id += 1;
            let id = store.next_id;
            let record = Match {
                id,
                competition_id: new_match.competition_id,
                stage: new_match.stage,
                home_team: new_match.home_team,
                away_team: new_match.away_team,
                home_score: new_match.home_score,
                away_score: new_match.away_score,
                sequence: new_match.sequence,
                external_id: new_match.external_id,
                created_at: now,
                updated_at: now,
            };
            store.matches.insert(id, record.clone());
            result.inserted.push(record);
        }
        self.record_writes(result.inserted_count() as u64);
        Ok(result)
    }
}
