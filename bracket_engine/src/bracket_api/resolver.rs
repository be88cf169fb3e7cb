//! The placeholder cascade.
//!
//! Resolution walks the knockout chain in playing order: group tables feed the first round, and each decided match
//! feeds its winner (and, for the round before the final, its loser) into the slots that reference it. Every write is a
//! compare-and-set on a slot that was just read holding the expected token, so running the cascade again with
//! unchanged data writes nothing.
use std::collections::{BTreeMap, HashSet};

use log::*;

use crate::{
    bracket_api::{
        bracket_flow_api::BracketApi,
        bracket_objects::{ResolutionSummary, SlotResolution, Substitution},
        errors::BracketApiError,
    },
    db_types::{group_code, is_group_stage, Match, MatchOutcome, Slot, FINAL_STAGE, THIRD_PLACE_STAGE},
    helpers::{is_seeded_layout, seed_lookup, Placeholder, BEST_THIRDS_QUALIFYING, ROUND_OF_32_PAIRINGS},
    standings::{rank_thirds, Clock, Standings},
    traits::{CompareAndSet, MatchFilter, MatchRepository},
};

/// The stage whose third-placed teams are ranked across groups in the seeded layout.
pub const BEST_THIRDS_STAGE: &str = "Round of 32";

/// Orders the knockout stages of a competition from the first round to the final.
///
/// Group stages and the third-place match are excluded. Rounds shrink as the bracket progresses, so stages are sorted
/// by descending match count, with the final always last and earlier-created stages first on a tie.
pub fn knockout_chain(matches: &[Match]) -> Vec<String> {
    let mut stages: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for m in matches.iter().filter(|m| !m.is_group_stage() && m.stage != THIRD_PLACE_STAGE) {
        let entry = stages.entry(m.stage.as_str()).or_insert((0, m.id));
        entry.0 += 1;
        entry.1 = entry.1.min(m.id);
    }
    let mut chain = stages.into_iter().collect::<Vec<_>>();
    chain.sort_by_key(|(stage, (count, first_id))| (*stage == FINAL_STAGE, std::cmp::Reverse(*count), *first_id));
    chain.into_iter().map(|(stage, _)| stage.to_string()).collect()
}

/// The group-stage information the first round is resolved from.
#[derive(Debug, Clone, Default)]
pub struct GroupSources {
    /// Final group tables keyed by group code. Only groups whose matches have all been played are included.
    tables: BTreeMap<String, Vec<String>>,
    /// Group codes whose third-placed team is among the best thirds. Empty until every group is complete.
    best_thirds: HashSet<String>,
    seeded: bool,
}

impl GroupSources {
    /// Builds the sources from the current standings and the group matches they were computed from.
    pub fn new(standings: &Standings, group_matches: &[Match]) -> Self {
        let incomplete =
            group_matches.iter().filter(|m| !m.is_played()).map(|m| group_code(&m.stage)).collect::<HashSet<_>>();
        let codes = standings.keys().map(|g| group_code(g)).collect::<Vec<_>>();
        let tables = standings
            .iter()
            .filter(|(group, _)| !incomplete.contains(group_code(group)))
            .map(|(group, table)| (group_code(group).to_string(), table.iter().map(|e| e.team.clone()).collect()))
            .collect::<BTreeMap<_, _>>();
        let seeded = is_seeded_layout(&codes);
        let best_thirds = if seeded && incomplete.is_empty() {
            rank_thirds(standings)
                .into_iter()
                .take(BEST_THIRDS_QUALIFYING)
                .map(|c| c.group_code().to_string())
                .inspect(|g| {
                    let token = Placeholder::seed(g.as_str(), 3).to_string();
                    if !ROUND_OF_32_PAIRINGS.iter().any(|(h, a)| *h == token || *a == token) {
                        warn!("🔗️ The third of group {g} qualifies, but {token} has no slot in the Round of 32");
                    }
                })
                .collect()
        } else {
            HashSet::new()
        };
        if !incomplete.is_empty() {
            trace!("🔗️ Groups still in play: {incomplete:?}");
        }
        Self { tables, best_thirds, seeded }
    }

    fn ranked(&self, group: &str, rank: usize) -> Option<&str> {
        self.tables.get(group).and_then(|t| t.get(rank)).map(String::as_str)
    }

    /// Returns the team a group-sourced token in `stage` stands for, if it is known yet.
    pub fn resolve(&self, token: &Placeholder, stage: &str) -> Option<&str> {
        match token {
            Placeholder::GroupPosition { group, position } => self.ranked(group, position.checked_sub(1)?),
            Placeholder::Seed { group, position: 3 } if self.seeded && stage == BEST_THIRDS_STAGE => {
                if self.best_thirds.contains(group) {
                    self.ranked(group, 2)
                } else {
                    None
                }
            },
            Placeholder::Seed { group, position } => {
                let code = token.to_string();
                match seed_lookup(&code) {
                    Some((g, rank)) => self.ranked(g, rank),
                    None => self.ranked(group, position.checked_sub(1)?),
                }
            },
            _ => None,
        }
    }
}

/// Collects the substitutions of group-sourced tokens in any knockout slot.
pub fn group_substitutions(knockout: &[Match], sources: &GroupSources) -> Vec<Substitution> {
    let mut result = Vec::new();
    for m in knockout {
        for slot in Slot::BOTH {
            let expected = m.team(slot);
            let Some(token) = Placeholder::parse(expected).filter(Placeholder::is_group_sourced) else {
                continue;
            };
            if let Some(team) = sources.resolve(&token, &m.stage) {
                result.push(Substitution {
                    match_id: m.id,
                    stage: m.stage.clone(),
                    slot,
                    expected: expected.to_string(),
                    value: team.to_string(),
                });
            }
        }
    }
    result
}

/// Collects the substitutions produced by the decided matches of `round`.
///
/// Drawn matches are added to `undecided`. A winner or loser that is itself still a placeholder does not advance.
pub fn advance_substitutions(round: &str, knockout: &[Match], undecided: &mut Vec<i64>) -> Vec<Substitution> {
    let mut tokens = Vec::new();
    for m in knockout.iter().filter(|m| m.stage == round) {
        let Some((winner, loser)) = m.winner_and_loser() else {
            if m.outcome() == MatchOutcome::Undecided {
                warn!("🔗️ {m} ended level. Neither team advances until the result is corrected.");
                undecided.push(m.id);
            }
            continue;
        };
        if Placeholder::is_placeholder(winner) || Placeholder::is_placeholder(loser) {
            debug!("🔗️ {m} has a result but its teams are not both known yet. Skipping it.");
            continue;
        }
        tokens.push((Placeholder::round_winner(round, m.sequence).to_string(), winner));
        tokens.push((Placeholder::round_loser(round, m.sequence).to_string(), loser));
    }
    let mut result = Vec::new();
    for (token, team) in tokens {
        for m in knockout {
            for slot in Slot::BOTH.into_iter().filter(|s| m.team(*s) == token) {
                result.push(Substitution {
                    match_id: m.id,
                    stage: m.stage.clone(),
                    slot,
                    expected: token.clone(),
                    value: team.to_string(),
                });
            }
        }
    }
    result
}

impl<B, C> BracketApi<B, C>
where
    B: MatchRepository,
    C: Clock,
{
    /// Substitutes every team name that can be known from the current results into the knockout placeholders of the
    /// competition.
    ///
    /// Missing results stop only their own branch of the bracket. Repository failures are returned as-is, leaving the
    /// remaining placeholders to be filled by the next run.
    pub async fn resolve_downstream(&self, competition_id: &str) -> Result<ResolutionSummary, BracketApiError> {
        self.standings.invalidate(Some(competition_id)).await;
        let standings = self.standings.standings(competition_id).await?;
        let all = self.db.find_matches(MatchFilter::for_competition(competition_id)).await?;
        let (group_matches, knockout): (Vec<_>, Vec<_>) = all.into_iter().partition(|m| m.is_group_stage());
        if knockout.is_empty() {
            trace!("🔗️ {competition_id} has no knockout matches yet");
            return Ok(ResolutionSummary::default());
        }
        let mut summary = ResolutionSummary::default();

        let sources = GroupSources::new(&standings, &group_matches);
        let substitutions = group_substitutions(&knockout, &sources);
        summary.resolved.extend(self.apply_substitutions(competition_id, substitutions).await?);

        let chain = knockout_chain(&knockout);
        debug!("🔗️ Knockout chain for {competition_id}: {}", chain.join(" → "));
        for round in chain.iter().filter(|r| r.as_str() != FINAL_STAGE) {
            let knockout = self.knockout_matches(competition_id).await?;
            let substitutions = advance_substitutions(round, &knockout, &mut summary.undecided);
            summary.resolved.extend(self.apply_substitutions(competition_id, substitutions).await?);
        }
        if summary.is_no_op() {
            debug!("🔗️ Nothing new to resolve for {competition_id}");
        } else {
            info!("🔗️ {} slot(s) resolved for {competition_id}", summary.resolved_count());
        }
        Ok(summary)
    }

    async fn knockout_matches(&self, competition_id: &str) -> Result<Vec<Match>, BracketApiError> {
        let matches = self.db.find_matches(MatchFilter::for_competition(competition_id)).await?;
        Ok(matches.into_iter().filter(|m| !is_group_stage(&m.stage)).collect())
    }

    /// Issues one compare-and-set per distinct (stage, slot, token) and publishes an event for each confirmed change.
    async fn apply_substitutions(
        &self,
        competition_id: &str,
        substitutions: Vec<Substitution>,
    ) -> Result<Vec<SlotResolution>, BracketApiError> {
        let mut issued = HashSet::new();
        let mut confirmed = HashSet::new();
        let mut resolved = Vec::new();
        for sub in substitutions {
            let key = (sub.stage.clone(), sub.slot, sub.expected.clone());
            if issued.insert(key.clone()) {
                let cas = CompareAndSet::new(competition_id, sub.slot, &sub.expected, &sub.value).in_stage(&sub.stage);
                let changed = self.db.compare_and_set(cas.clone()).await?;
                if changed > 0 {
                    trace!("🔗️ {cas} ({changed} row(s))");
                    confirmed.insert(key.clone());
                } else {
                    debug!("🔗️ {cas} changed nothing. Another run got there first.");
                }
            }
            if confirmed.contains(&key) {
                let resolution = SlotResolution::from(sub);
                self.producers.publish_slot_resolved(resolution.to_event(competition_id)).await;
                resolved.push(resolution);
            }
        }
        Ok(resolved)
    }
}
