use bracket_engine::{
    db_types::{Match, NewMatch},
    helpers::Placeholder,
    MatchFilter,
    MatchRepository,
};
use cucumber::{then, when};

use crate::cucumber::{bracket_world::COMPETITION, BracketWorld};

#[when(expr = "group {word} ends with {word} ahead of {word} ahead of {word}")]
async fn completed_group(world: &mut BracketWorld, group: String, first: String, second: String, third: String) {
    let label = format!("Grupo {group}");
    let matches = vec![
        NewMatch::new(COMPETITION, &label, &first, &second, 1).with_score(2, 0),
        NewMatch::new(COMPETITION, &label, &first, &third, 2).with_score(1, 0),
        NewMatch::new(COMPETITION, &label, &second, &third, 3).with_score(1, 0),
    ];
    world.api().db().insert_many(matches).await.expect("Error inserting group matches");
}

#[when(expr = "I generate the bracket with {int} qualifiers per group")]
async fn generate_bracket(world: &mut BracketWorld, qualifiers: usize) {
    world.api().generate_bracket(COMPETITION, qualifiers, COMPETITION).await.expect("Error generating bracket");
}

#[when("I resolve the bracket")]
async fn resolve(world: &mut BracketWorld) {
    world.api().resolve_downstream(COMPETITION).await.expect("Error resolving bracket");
}

#[when(expr = "{word} match {int} ends {int} to {int}")]
async fn record_result(world: &mut BracketWorld, stage: String, sequence: i64, home: i64, away: i64) {
    let id = find_match(world, &stage, sequence).await.id;
    world.api().record_result(id, home, away).await.expect("Error recording result");
}

async fn find_match(world: &BracketWorld, stage: &str, sequence: i64) -> Match {
    let filter = MatchFilter::for_competition(COMPETITION).with_stage(stage);
    let matches = world.api().db().find_matches(filter).await.expect("Error fetching matches");
    matches.into_iter().find(|m| m.sequence == sequence).unwrap_or_else(|| panic!("No {stage} match {sequence}"))
}

#[then(expr = "there are {int} {word} matches")]
async fn count_matches(world: &mut BracketWorld, count: usize, stage: String) {
    let filter = MatchFilter::for_competition(COMPETITION).with_stage(&stage);
    let matches = world.api().db().find_matches(filter).await.expect("Error fetching matches");
    assert_eq!(matches.len(), count, "Wrong number of {stage} matches");
}

#[then(expr = "{word} match {int} is {word} vs {word}")]
async fn check_match(world: &mut BracketWorld, stage: String, sequence: i64, home: String, away: String) {
    let m = find_match(world, &stage, sequence).await;
    assert_eq!(m.home_team, home, "Wrong home team in {m}");
    assert_eq!(m.away_team, away, "Wrong away team in {m}");
}

#[then(expr = "{word} match {int} has {word} at home")]
async fn check_home(world: &mut BracketWorld, stage: String, sequence: i64, home: String) {
    let m = find_match(world, &stage, sequence).await;
    assert_eq!(m.home_team, home, "Wrong home team in {m}");
}

#[then(expr = "the {word} slot of {word} match {int} is still open")]
async fn check_open(world: &mut BracketWorld, which: String, stage: String, sequence: i64) {
    let m = find_match(world, &stage, sequence).await;
    let team = if which == "home" { &m.home_team } else { &m.away_team };
    assert!(Placeholder::is_placeholder(team), "{team} is not a placeholder");
}

#[then("resolving again changes nothing")]
async fn resolve_is_idempotent(world: &mut BracketWorld) {
    let summary = world.api().resolve_downstream(COMPETITION).await.expect("Error resolving bracket");
    assert!(summary.is_no_op(), "Second run resolved {} slot(s)", summary.resolved_count());
}

#[then(expr = "group {word} is led by {word}")]
async fn group_leader(world: &mut BracketWorld, group: String, team: String) {
    let standings = world.api().standings().standings(COMPETITION).await.expect("Error fetching standings");
    let table = standings.get(&format!("Grupo {group}")).expect("Group does not exist");
    assert_eq!(table[0].team, team);
}
