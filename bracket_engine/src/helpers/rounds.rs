/// Knockout round names, keyed by the number of teams entering the round.
pub const ROUND_LABELS: [(usize, &str); 5] =
    [(32, "Round of 32"), (16, "Round of 16"), (8, "Quarterfinals"), (4, "Semifinals"), (2, "Final")];

/// Returns the name of a knockout round that `teams` teams enter. Sizes missing from [`ROUND_LABELS`] get a generic
/// `Round of N` label.
pub fn round_label(teams: usize) -> String {
    ROUND_LABELS
        .iter()
        .find(|(size, _)| *size == teams)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("Round of {teams}"))
}
