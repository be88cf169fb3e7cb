mod placeholder;
mod rounds;
mod seeding;

pub use placeholder::Placeholder;
pub use rounds::{round_label, ROUND_LABELS};
pub use seeding::{
    is_seeded_layout,
    seed_lookup,
    BEST_THIRDS_QUALIFYING,
    ROUND_OF_32_PAIRINGS,
    SEEDED_GROUPS,
    SEED_TABLE,
};
