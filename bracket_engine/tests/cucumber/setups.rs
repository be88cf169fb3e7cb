use cucumber::given;

use crate::cucumber::{bracket_world::BracketSystem, BracketWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut BracketWorld) {
    let system = BracketSystem::new().await;
    world.system = Some(system);
}
