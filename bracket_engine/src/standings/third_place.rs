use serde::{Deserialize, Serialize};

use crate::{
    db_types::group_code,
    standings::calculator::{ranking_order, Standings},
};

/// Rank index of the third-placed team in a group table.
const THIRD_PLACE_INDEX: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPlaceCandidate {
    /// The group label, e.g. `Grupo C`.
    pub group: String,
    pub team: String,
    pub points: i64,
    pub goal_difference: i64,
    pub goals_for: i64,
}

impl ThirdPlaceCandidate {
    /// The group code, e.g. `C` for `Grupo C`.
    pub fn group_code(&self) -> &str {
        group_code(&self.group)
    }
}

/// Ranks the third-placed team of every group using the same tie-break chain as the group tables.
///
/// Groups with fewer than three teams contribute no candidate. Candidates level on all keys keep group label order.
pub fn rank_thirds(standings: &Standings) -> Vec<ThirdPlaceCandidate> {
    let mut thirds = standings
        .iter()
        .filter_map(|(group, table)| {
            table.get(THIRD_PLACE_INDEX).map(|e| ThirdPlaceCandidate {
                group: group.clone(),
                team: e.team.clone(),
                points: e.points,
                goal_difference: e.goal_difference,
                goals_for: e.goals_for,
            })
        })
        .collect::<Vec<_>>();
    let key = |c: &ThirdPlaceCandidate| ranking_order(c.points, c.goal_difference, c.goals_for);
    thirds.sort_by(|a, b| key(b).cmp(&key(a)));
    thirds
}
