use bracket_engine::{
    test_utils::prepare_env::{create_database, random_db_path, run_migrations},
    BracketApi,
    EventProducers,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

pub const COMPETITION: &str = "copa";

#[derive(Default, Debug, World)]
pub struct BracketWorld {
    pub system: Option<BracketSystem>,
}

#[derive(Debug)]
pub struct BracketSystem {
    pub db_path: String,
    pub api: BracketApi<SqliteDatabase>,
}

impl BracketWorld {
    pub fn api(&self) -> &BracketApi<SqliteDatabase> {
        &self.system.as_ref().expect("BracketApi not initialised").api
    }
}

impl BracketSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let api = BracketApi::new(db, EventProducers::default());
        Self { db_path: url, api }
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
