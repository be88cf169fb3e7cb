//! Knockout bracket generation.
//!
//! The first round is built from the group tables, either by pairing neighbouring groups (A with B, C with D, ...) or,
//! for the twelve-group layout, from the fixed Round of 32 table. Every later round pairs the winners of consecutive
//! matches of the previous round until a single winner remains.
use log::*;

use crate::{
    bracket_api::{bracket_flow_api::BracketApi, bracket_objects::BracketPlan, errors::BracketApiError},
    db_types::{group_code, Match, NewMatch, THIRD_PLACE_STAGE},
    events::BracketGeneratedEvent,
    helpers::{is_seeded_layout, round_label, Placeholder, ROUND_OF_32_PAIRINGS},
    standings::{Clock, Standings},
    traits::MatchRepository,
};

/// Brackets with more groups than this use seed codes (`A1`) rather than direct group tokens (`Winner A`).
pub const MAX_DIRECT_GROUPS: usize = 4;

/// The idempotency key of a generated match.
pub fn external_id(bracket_key: &str, stage: &str, sequence: i64) -> String {
    format!("{bracket_key}:{stage}:{sequence}")
}

/// Plans the knockout matches for the groups in `standings`, without storing anything.
///
/// Only the group labels are used; the tables themselves may still be empty. `bracket_key` namespaces the
/// idempotency keys of the generated matches.
pub fn plan_bracket(
    competition_id: &str,
    bracket_key: &str,
    standings: &Standings,
    qualifiers_per_group: usize,
) -> Result<BracketPlan, BracketApiError> {
    if qualifiers_per_group == 0 {
        return Err(BracketApiError::InvalidQualifierCount(qualifiers_per_group));
    }
    // BTreeMap keys are already sorted
    let codes = standings.keys().map(|g| group_code(g).to_string()).collect::<Vec<_>>();
    if codes.is_empty() {
        debug!("🗂️ {competition_id} has no groups. There is no bracket to generate.");
        return Ok(BracketPlan::default());
    }
    let seeded = codes.len() > MAX_DIRECT_GROUPS;
    let (pairs, byes) = if seeded && qualifiers_per_group == 2 && is_seeded_layout(&codes) {
        let pairs = ROUND_OF_32_PAIRINGS.iter().map(|(h, a)| (h.to_string(), a.to_string())).collect();
        (pairs, Vec::new())
    } else {
        pair_groups(&codes, qualifiers_per_group, seeded)
    };
    let entering = pairs.len() * 2 + byes.len();
    let first_round = round_label(entering);
    info!(
        "🗂️ Planning bracket for {competition_id}: {} groups, {qualifiers_per_group} qualifier(s) each, {entering} teams \
         in the {first_round}",
        codes.len()
    );

    let new_match = |stage: &str, home: String, away: String, sequence: i64| {
        NewMatch::new(competition_id, stage, home, away, sequence)
            .with_external_id(external_id(bracket_key, stage, sequence))
    };
    let mut matches = Vec::new();
    let mut entrants = Vec::new();
    for (i, (home, away)) in pairs.into_iter().enumerate() {
        let sequence = i as i64 + 1;
        matches.push(new_match(&first_round, home, away, sequence));
        entrants.push(Placeholder::round_winner(&first_round, sequence).to_string());
    }
    entrants.extend(byes);

    let mut previous_round = first_round.clone();
    let mut previous_matches = matches.len();
    while entrants.len() > 1 {
        let stage = round_label(entrants.len());
        let feeds_from_semifinals = entrants.len() == 2 && previous_matches == 2;
        if feeds_from_semifinals {
            let home = Placeholder::round_loser(&previous_round, 1).to_string();
            let away = Placeholder::round_loser(&previous_round, 2).to_string();
            matches.push(new_match(THIRD_PLACE_STAGE, home, away, 1));
        }
        let mut next = Vec::with_capacity(entrants.len() / 2 + 1);
        let mut sequence = 0;
        for pair in entrants.chunks(2) {
            match pair {
                [home, away] => {
                    sequence += 1;
                    matches.push(new_match(&stage, home.clone(), away.clone(), sequence));
                    next.push(Placeholder::round_winner(&stage, sequence).to_string());
                },
                [bye] => {
                    debug!("🗂️ {bye} has a bye through the {stage}");
                    next.push(bye.clone());
                },
                _ => unreachable!("chunks(2) yields one or two items"),
            }
        }
        previous_round = stage;
        previous_matches = sequence as usize;
        entrants = next;
    }
    Ok(BracketPlan { first_round, matches })
}

/// Pairs neighbouring groups for the first round. Returns the pairings, and the tokens of teams that have no opponent.
fn pair_groups(codes: &[String], qualifiers: usize, seeded: bool) -> (Vec<(String, String)>, Vec<String>) {
    let token = |group: &str, position: usize| {
        if seeded {
            Placeholder::seed(group, position).to_string()
        } else {
            Placeholder::group_position(group, position).to_string()
        }
    };
    let mut pairs = Vec::new();
    let mut byes = Vec::new();
    for groups in codes.chunks(2) {
        match groups {
            [a, b] if qualifiers >= 2 => {
                pairs.push((token(a, 1), token(b, 2)));
                pairs.push((token(b, 1), token(a, 2)));
                for position in 3..=qualifiers {
                    pairs.push((token(a, position), token(b, position)));
                }
            },
            [a, b] => pairs.push((token(a, 1), token(b, 1))),
            [lone] => {
                warn!("🗂️ Group {lone} has no neighbouring group. Its qualifiers are paired with each other.");
                let mut position = 1;
                while position <= qualifiers {
                    if position < qualifiers {
                        pairs.push((token(lone, position), token(lone, position + 1)));
                    } else {
                        byes.push(token(lone, position));
                    }
                    position += 2;
                }
            },
            _ => unreachable!("chunks(2) yields one or two items"),
        }
    }
    (pairs, byes)
}

impl<B, C> BracketApi<B, C>
where
    B: MatchRepository,
    C: Clock,
{
    /// Generates the knockout skeleton for the competition from its current group tables and stores it with a single
    /// bulk insert.
    ///
    /// Generating again with the same `bracket_key` does not create duplicates. The returned list contains only the
    /// matches created by this call.
    pub async fn generate_bracket(
        &self,
        competition_id: &str,
        qualifiers_per_group: usize,
        bracket_key: &str,
    ) -> Result<Vec<Match>, BracketApiError> {
        let standings = self.standings.standings(competition_id).await?;
        let plan = plan_bracket(competition_id, bracket_key, &standings, qualifiers_per_group)?;
        if plan.is_empty() {
            return Ok(Vec::new());
        }
        let first_round = plan.first_round.clone();
        let result = self.db.insert_many(plan.matches).await?;
        info!(
            "🗂️ Bracket for {competition_id} stored. {} matches created, {} already existed",
            result.inserted_count(),
            result.skipped_count()
        );
        let event = BracketGeneratedEvent {
            competition_id: competition_id.to_string(),
            first_round,
            inserted: result.inserted_count(),
        };
        self.producers.publish_bracket_generated(event).await;
        Ok(result.inserted)
    }
}
