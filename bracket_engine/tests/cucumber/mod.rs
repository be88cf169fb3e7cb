mod bracket_world;
mod setups;
mod steps;

pub use bracket_world::BracketWorld;
