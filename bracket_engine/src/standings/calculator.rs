use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::db_types::Match;

pub const POINTS_FOR_WIN: i64 = 3;
pub const POINTS_FOR_DRAW: i64 = 1;

/// Group label → table, best team first.
pub type Standings = BTreeMap<String, Vec<StandingsEntry>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
}

impl StandingsEntry {
    pub fn new<S: Into<String>>(team: S) -> Self {
        Self { team: team.into(), ..Default::default() }
    }

    fn record(&mut self, scored: i64, conceded: i64) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for - self.goals_against;
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.wins += 1;
                self.points += POINTS_FOR_WIN;
            },
            Ordering::Equal => {
                self.draws += 1;
                self.points += POINTS_FOR_DRAW;
            },
            Ordering::Less => self.losses += 1,
        }
    }
}

/// The tie-break chain shared by group tables and the third-place ranking: points, then goal difference, then goals
/// scored, all descending.
pub fn ranking_order(points: i64, goal_difference: i64, goals_for: i64) -> impl Ord {
    (points, goal_difference, goals_for)
}

fn entry_key(e: &StandingsEntry) -> impl Ord {
    ranking_order(e.points, e.goal_difference, e.goals_for)
}

/// Reduces the group-stage matches of a competition to per-group tables.
///
/// Matches outside the group stage are ignored. Unplayed matches register both teams without affecting any totals.
/// Teams level on all three tie-break keys keep the order in which they first appear in `matches`.
pub fn compute_standings<'a, I>(matches: I) -> Standings
where I: IntoIterator<Item = &'a Match> {
    let mut standings = Standings::new();
    for m in matches.into_iter().filter(|m| m.is_group_stage()) {
        let table = standings.entry(m.stage.clone()).or_default();
        let home = position_of(table, &m.home_team);
        let away = position_of(table, &m.away_team);
        if let (Some(h), Some(a)) = (m.home_score, m.away_score) {
            table[home].record(h, a);
            table[away].record(a, h);
        }
    }
    for table in standings.values_mut() {
        // sort_by is stable, which preserves first-appearance order on full ties
        table.sort_by(|a, b| entry_key(b).cmp(&entry_key(a)));
    }
    standings
}

fn position_of(table: &mut Vec<StandingsEntry>, team: &str) -> usize {
    match table.iter().position(|e| e.team == team) {
        Some(i) => i,
        None => {
            table.push(StandingsEntry::new(team));
            table.len() - 1
        },
    }
}
