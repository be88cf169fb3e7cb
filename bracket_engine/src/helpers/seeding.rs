//! Fixed tables for the seeded (large bracket) layout.
//!
//! Twelve groups, `A` to `L`, send their winners and runners-up plus the eight best third-placed teams to a Round of
//! 32. Seed code `B2` means "second place of group B". The `<Group>3` codes are only filled if that group's third is
//! among the eight best thirds.

/// Number of third-placed teams that go through to the Round of 32.
pub const BEST_THIRDS_QUALIFYING: usize = 8;

/// Group codes of the seeded layout, in order.
pub const SEEDED_GROUPS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];

/// Seed code → (group code, rank index in the group standings).
pub const SEED_TABLE: [(&str, &str, usize); 24] = [
    ("A1", "A", 0),
    ("B2", "B", 1),
    ("B1", "B", 0),
    ("A2", "A", 1),
    ("C1", "C", 0),
    ("D2", "D", 1),
    ("D1", "D", 0),
    ("C2", "C", 1),
    ("E1", "E", 0),
    ("F2", "F", 1),
    ("F1", "F", 0),
    ("E2", "E", 1),
    ("G1", "G", 0),
    ("H2", "H", 1),
    ("H1", "H", 0),
    ("G2", "G", 1),
    ("I1", "I", 0),
    ("J2", "J", 1),
    ("J1", "J", 0),
    ("I2", "I", 1),
    ("K1", "K", 0),
    ("L2", "L", 1),
    ("L1", "L", 0),
    ("K2", "K", 1),
];

/// Round of 32 pairings, in bracket order. Consecutive matches feed the same Round of 16 match, and no two teams from
/// the same group can meet before the Round of 16 is over.
pub const ROUND_OF_32_PAIRINGS: [(&str, &str); 16] = [
    ("E1", "A3"),
    ("B1", "D2"),
    ("F1", "B3"),
    ("A1", "C2"),
    ("G1", "C3"),
    ("D1", "B2"),
    ("H1", "D3"),
    ("C1", "A2"),
    ("I1", "E3"),
    ("G2", "H2"),
    ("J1", "F3"),
    ("K2", "L2"),
    ("K1", "G3"),
    ("E2", "F2"),
    ("L1", "H3"),
    ("I2", "J2"),
];

/// Looks up a seed code in [`SEED_TABLE`], returning the group code and rank index.
pub fn seed_lookup(code: &str) -> Option<(&'static str, usize)> {
    SEED_TABLE.iter().find(|(seed, _, _)| *seed == code).map(|(_, group, rank)| (*group, *rank))
}

/// True if the group codes are exactly those of the seeded layout.
pub fn is_seeded_layout<S: AsRef<str>>(group_codes: &[S]) -> bool {
    group_codes.len() == SEEDED_GROUPS.len() && group_codes.iter().zip(SEEDED_GROUPS).all(|(g, s)| g.as_ref() == s)
}
