//! Time-bounded memoization of computed standings.
//!
//! The cache saves recomputing group tables on every read. It does not make reads correct: writers must call
//! [`StandingsCache::invalidate`] after changing group results. The time-to-live only bounds how stale an entry can get
//! if a writer forgets.
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::*;
use tokio::sync::RwLock;

use crate::standings::Standings;

/// A source of the current time, so that expiry can be tested without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { millis: Arc::new(AtomicI64::new(start.timestamp_millis())) }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.millis.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(ms).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Cache entries are keyed by the trimmed, lower-cased competition id, so `" Copa "` and `"copa"` share an entry.
fn cache_key(competition_id: &str) -> String {
    competition_id.trim().to_lowercase()
}

struct CachedStandings {
    computed_at: DateTime<Utc>,
    standings: Arc<Standings>,
}

pub struct StandingsCache<C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: RwLock<HashMap<String, CachedStandings>>,
    /// Bumped on every invalidation. Results computed before an invalidation are not stored.
    generation: AtomicU64,
}

impl StandingsCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> StandingsCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self { ttl, clock, entries: RwLock::new(HashMap::new()), generation: AtomicU64::new(0) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current invalidation generation. Pass it to [`Self::insert`] along with standings computed after reading
    /// it.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns the cached standings, unless there are none or they are older than the time-to-live.
    pub async fn get(&self, competition_id: &str) -> Option<Arc<Standings>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&cache_key(competition_id))?;
        if self.clock.now() - entry.computed_at >= self.ttl {
            trace!("🏆️ Cached standings for {competition_id} have expired");
            return None;
        }
        Some(Arc::clone(&entry.standings))
    }

    /// Stores freshly computed standings. Returns false, and stores nothing, if the cache was invalidated since
    /// `generation` was read.
    pub async fn insert(&self, competition_id: &str, standings: Arc<Standings>, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if self.generation() != generation {
            debug!("🏆️ Standings for {competition_id} were invalidated while being computed. Not caching them.");
            return false;
        }
        entries.insert(cache_key(competition_id), CachedStandings { computed_at: self.clock.now(), standings });
        true
    }

    /// Drops the entry for one competition, or every entry if `competition_id` is `None`.
    pub async fn invalidate(&self, competition_id: Option<&str>) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        match competition_id {
            Some(id) => {
                if entries.remove(&cache_key(id)).is_some() {
                    trace!("🏆️ Standings cache entry for {id} invalidated");
                }
            },
            None => {
                trace!("🏆️ Clearing all {} standings cache entries", entries.len());
                entries.clear();
            },
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
