use bracket_engine::{
    db_types::{Match, NewMatch, Slot, FINAL_STAGE, THIRD_PLACE_STAGE},
    helpers::Placeholder,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    BracketApi,
    EventProducers,
    InMemoryRepository,
    MatchFilter,
    MatchRepository,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

async fn setup() -> BracketApi<SqliteDatabase> {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating database");
    BracketApi::new(db, EventProducers::default())
}

async fn tear_down(mut api: BracketApi<SqliteDatabase>) {
    let url = api.db().url().to_string();
    if let Err(e) = api.db_mut().close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.unwrap();
}

/// A complete three-team group in which the teams finish in the order given.
fn group(competition: &str, label: &str, teams: [&str; 3]) -> Vec<NewMatch> {
    vec![
        NewMatch::new(competition, label, teams[0], teams[1], 1).with_score(2, 0),
        NewMatch::new(competition, label, teams[0], teams[2], 2).with_score(1, 0),
        NewMatch::new(competition, label, teams[1], teams[2], 3).with_score(1, 0),
    ]
}

async fn find<B: MatchRepository>(db: &B, competition: &str, stage: &str) -> Vec<Match> {
    db.find_matches(MatchFilter::for_competition(competition).with_stage(stage)).await.unwrap()
}

#[tokio::test]
async fn seed_codes_resolve_from_group_tables() {
    let api = setup().await;
    let mut matches = group("mundial", "Grupo A", ["Brasil", "Peru", "Bolivia"]);
    matches.extend(group("mundial", "Grupo B", ["Argentina", "Chile", "Ecuador"]));
    matches.push(NewMatch::new("mundial", "Round of 32", "A1", "B2", 4));
    api.db().insert_many(matches).await.unwrap();

    let summary = api.resolve_downstream("mundial").await.unwrap();
    assert_eq!(summary.resolved_count(), 2);
    let r32 = find(api.db(), "mundial", "Round of 32").await;
    assert_eq!(r32[0].home_team, "Brasil");
    assert_eq!(r32[0].away_team, "Chile");
    tear_down(api).await;
}

#[tokio::test]
async fn semifinal_result_feeds_final_and_third_place() {
    let api = setup().await;
    let matches = vec![
        NewMatch::new("copa", "Semifinals", "Brasil", "Chile", 1),
        NewMatch::new("copa", "Semifinals", "Argentina", "Uruguay", 2),
        NewMatch::new("copa", THIRD_PLACE_STAGE, "Loser Semifinals-1", "Loser Semifinals-2", 1),
        NewMatch::new("copa", FINAL_STAGE, "Winner Semifinals-1", "Winner Semifinals-2", 1),
    ];
    let inserted = api.db().insert_many(matches).await.unwrap().inserted;
    let recorded = api.record_result(inserted[0].id, 2, 1).await.unwrap();
    assert_eq!(recorded.updated.home_score, Some(2));
    assert_eq!(recorded.resolution.resolved_count(), 2);

    let final_match = &find(api.db(), "copa", FINAL_STAGE).await[0];
    assert_eq!(final_match.home_team, "Brasil");
    assert_eq!(final_match.away_team, "Winner Semifinals-2");
    let third = &find(api.db(), "copa", THIRD_PLACE_STAGE).await[0];
    assert_eq!(third.home_team, "Chile");
    assert_eq!(third.away_team, "Loser Semifinals-2");

    api.record_result(inserted[1].id, 0, 1).await.unwrap();
    let final_match = &find(api.db(), "copa", FINAL_STAGE).await[0];
    assert_eq!((final_match.home_team.as_str(), final_match.away_team.as_str()), ("Brasil", "Uruguay"));
    let third = &find(api.db(), "copa", THIRD_PLACE_STAGE).await[0];
    assert_eq!((third.home_team.as_str(), third.away_team.as_str()), ("Chile", "Argentina"));
    tear_down(api).await;
}

#[tokio::test]
async fn drawn_knockout_match_leaves_slots_open() {
    let api = setup().await;
    let matches = vec![
        NewMatch::new("copa", "Semifinals", "Brasil", "Chile", 1),
        NewMatch::new("copa", "Semifinals", "Argentina", "Uruguay", 2),
        NewMatch::new("copa", FINAL_STAGE, "Winner Semifinals-1", "Winner Semifinals-2", 1),
    ];
    let inserted = api.db().insert_many(matches).await.unwrap().inserted;
    let recorded = api.record_result(inserted[0].id, 1, 1).await.unwrap();
    assert!(recorded.resolution.is_no_op());
    assert_eq!(recorded.resolution.undecided, vec![inserted[0].id]);
    let final_match = &find(api.db(), "copa", FINAL_STAGE).await[0];
    assert_eq!(final_match.home_team, "Winner Semifinals-1");
    tear_down(api).await;
}

#[tokio::test]
async fn generated_bracket_runs_to_a_champion() {
    let api = setup().await;
    let mut matches = Vec::new();
    for (label, teams) in [
        ("Grupo A", ["Brasil", "Peru", "Bolivia"]),
        ("Grupo B", ["Argentina", "Chile", "Ecuador"]),
        ("Grupo C", ["Uruguay", "Colombia", "Venezuela"]),
        ("Grupo D", ["Mexico", "Paraguay", "Jamaica"]),
    ] {
        matches.extend(group("copa", label, teams));
    }
    api.db().insert_many(matches).await.unwrap();

    let created = api.generate_bracket("copa", 2, "copa-2024").await.unwrap();
    assert_eq!(created.len(), 8);
    let again = api.generate_bracket("copa", 2, "copa-2024").await.unwrap();
    assert!(again.is_empty());

    let summary = api.resolve_downstream("copa").await.unwrap();
    assert_eq!(summary.resolved_count(), 8);
    let quarters = find(api.db(), "copa", "Quarterfinals").await;
    let pairs = quarters.iter().map(|m| (m.home_team.as_str(), m.away_team.as_str())).collect::<Vec<_>>();
    assert_eq!(pairs, vec![
        ("Brasil", "Chile"),
        ("Argentina", "Peru"),
        ("Uruguay", "Paraguay"),
        ("Mexico", "Colombia")
    ]);

    // home sides win every knockout match
    for stage in ["Quarterfinals", "Semifinals", FINAL_STAGE] {
        for m in find(api.db(), "copa", stage).await {
            api.record_result(m.id, 1, 0).await.unwrap();
        }
    }
    let semis = find(api.db(), "copa", "Semifinals").await;
    assert_eq!((semis[0].home_team.as_str(), semis[0].away_team.as_str()), ("Brasil", "Argentina"));
    assert_eq!((semis[1].home_team.as_str(), semis[1].away_team.as_str()), ("Uruguay", "Mexico"));
    let final_match = &find(api.db(), "copa", FINAL_STAGE).await[0];
    assert_eq!((final_match.home_team.as_str(), final_match.away_team.as_str()), ("Brasil", "Uruguay"));
    let third = &find(api.db(), "copa", THIRD_PLACE_STAGE).await[0];
    assert_eq!((third.home_team.as_str(), third.away_team.as_str()), ("Argentina", "Mexico"));
    tear_down(api).await;
}

#[tokio::test]
async fn second_run_makes_no_writes() {
    let db = InMemoryRepository::new();
    let api = BracketApi::new(db.clone(), EventProducers::default());
    let mut matches = group("copa", "Grupo A", ["Brasil", "Peru", "Bolivia"]);
    matches.extend(group("copa", "Grupo B", ["Argentina", "Chile", "Ecuador"]));
    db.insert_many(matches).await.unwrap();
    api.generate_bracket("copa", 2, "v1").await.unwrap();
    let semis = find(&db, "copa", "Semifinals").await;
    api.record_result(semis[0].id, 3, 1).await.unwrap();

    let before = db.write_count();
    let state = db.all_matches().await;
    let summary = api.resolve_downstream("copa").await.unwrap();
    assert!(summary.is_no_op());
    assert_eq!(db.write_count(), before);
    assert_eq!(db.all_matches().await, state);
}

#[tokio::test]
async fn unplayed_groups_keep_their_placeholders() {
    let db = InMemoryRepository::new();
    let api = BracketApi::new(db.clone(), EventProducers::default());
    let mut matches = group("copa", "Grupo A", ["Brasil", "Peru", "Bolivia"]);
    matches.push(NewMatch::new("copa", "Grupo B", "Argentina", "Chile", 1).with_score(1, 0));
    matches.push(NewMatch::new("copa", "Grupo B", "Argentina", "Ecuador", 2));
    db.insert_many(matches).await.unwrap();
    api.generate_bracket("copa", 2, "v1").await.unwrap();

    api.resolve_downstream("copa").await.unwrap();
    let semis = find(&db, "copa", "Semifinals").await;
    assert_eq!((semis[0].home_team.as_str(), semis[0].away_team.as_str()), ("Brasil", "Runner-up B"));
    assert_eq!((semis[1].home_team.as_str(), semis[1].away_team.as_str()), ("Winner B", "Peru"));

    let pending = &db.find_matches(MatchFilter::for_competition("copa").with_team("Ecuador")).await.unwrap()[0];
    api.record_result(pending.id, 0, 2).await.unwrap();
    let semis = find(&db, "copa", "Semifinals").await;
    assert_eq!(semis[0].team(Slot::Away), "Argentina");
    assert_eq!(semis[1].team(Slot::Home), "Ecuador");
}

#[tokio::test]
async fn seeded_layout_fills_the_round_of_32() {
    let db = InMemoryRepository::new();
    let api = BracketApi::new(db.clone(), EventProducers::default());
    let mut matches = Vec::new();
    for (i, code) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"].into_iter().enumerate() {
        let label = format!("Grupo {code}");
        let (first, second, third) = (format!("Primero {code}"), format!("Segundo {code}"), format!("Tercero {code}"));
        // thirds of later groups lose by more, so the thirds of A..H go through
        matches.push(NewMatch::new("mundial", &label, &first, &second, 1).with_score(2, 0));
        matches.push(NewMatch::new("mundial", &label, &first, &third, 2).with_score(1, 0));
        matches.push(NewMatch::new("mundial", &label, &second, &third, 3).with_score(1 + i as i64, 0));
    }
    db.insert_many(matches).await.unwrap();

    let created = api.generate_bracket("mundial", 2, "mundial-2026").await.unwrap();
    assert_eq!(created.iter().filter(|m| m.stage == "Round of 32").count(), 16);
    let summary = api.resolve_downstream("mundial").await.unwrap();
    assert_eq!(summary.resolved_count(), 32);

    let r32 = find(&db, "mundial", "Round of 32").await;
    assert_eq!(r32.len(), 16);
    for m in &r32 {
        for slot in [Slot::Home, Slot::Away] {
            assert!(!Placeholder::is_placeholder(m.team(slot)), "{slot} slot of {m} is still open");
        }
    }
    assert_eq!((r32[0].home_team.as_str(), r32[0].away_team.as_str()), ("Primero E", "Tercero A"));
    assert_eq!((r32[14].home_team.as_str(), r32[14].away_team.as_str()), ("Primero L", "Tercero H"));
    let teams = r32.iter().flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()]).collect::<Vec<_>>();
    assert!(!teams.contains(&"Tercero I"));

    let before = db.write_count();
    assert!(api.resolve_downstream("mundial").await.unwrap().is_no_op());
    assert_eq!(db.write_count(), before);
}
