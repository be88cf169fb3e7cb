use std::{fmt::Display, sync::OnceLock};

use regex::Regex;

/// A token standing in for a team that is not known yet.
///
/// Two conventions exist for the first knockout round. Small brackets refer to groups directly (`Winner A`,
/// `Runner-up B`), large ones use compact seed codes (`A1`, `B2`, `C3`). Later rounds always refer to earlier matches
/// (`Winner Quarterfinals-3`, `Loser Semifinals-1`).
///
/// Positions are 1-based throughout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
    GroupPosition { group: String, position: usize },
    Seed { group: String, position: usize },
    RoundWinner { round: String, sequence: i64 },
    RoundLoser { round: String, sequence: i64 },
}

struct Patterns {
    round: Regex,
    winner: Regex,
    runner_up: Regex,
    ordinal: Regex,
    seed: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        round: Regex::new(r"^(Winner|Loser) (.+)-(\d+)$").unwrap(),
        winner: Regex::new(r"^Winner (.+)$").unwrap(),
        runner_up: Regex::new(r"^Runner-up (.+)$").unwrap(),
        ordinal: Regex::new(r"^(\d+)(?:st|nd|rd|th) (.+)$").unwrap(),
        seed: Regex::new(r"^([A-Z])(\d+)$").unwrap(),
    })
}

impl Placeholder {
    pub fn group_position<S: Into<String>>(group: S, position: usize) -> Self {
        Self::GroupPosition { group: group.into(), position }
    }

    pub fn seed<S: Into<String>>(group: S, position: usize) -> Self {
        Self::Seed { group: group.into(), position }
    }

    pub fn round_winner<S: Into<String>>(round: S, sequence: i64) -> Self {
        Self::RoundWinner { round: round.into(), sequence }
    }

    pub fn round_loser<S: Into<String>>(round: S, sequence: i64) -> Self {
        Self::RoundLoser { round: round.into(), sequence }
    }

    /// Parses a team slot value. Returns `None` if the value is not a placeholder, i.e. it is a real team name.
    pub fn parse(value: &str) -> Option<Self> {
        let p = patterns();
        if let Some(c) = p.round.captures(value) {
            let sequence = c[3].parse::<i64>().ok()?;
            let round = c[2].to_string();
            return match &c[1] {
                "Winner" => Some(Self::RoundWinner { round, sequence }),
                _ => Some(Self::RoundLoser { round, sequence }),
            };
        }
        if let Some(c) = p.winner.captures(value) {
            return Some(Self::group_position(&c[1], 1));
        }
        if let Some(c) = p.runner_up.captures(value) {
            return Some(Self::group_position(&c[1], 2));
        }
        if let Some(c) = p.ordinal.captures(value) {
            let position = c[1].parse::<usize>().ok().filter(|p| *p > 0)?;
            return Some(Self::group_position(&c[2], position));
        }
        if let Some(c) = p.seed.captures(value) {
            let position = c[2].parse::<usize>().ok().filter(|p| *p > 0)?;
            return Some(Self::seed(&c[1], position));
        }
        None
    }

    pub fn is_placeholder(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    /// True for tokens that are filled from group standings, as opposed to knockout results.
    pub fn is_group_sourced(&self) -> bool {
        matches!(self, Self::GroupPosition { .. } | Self::Seed { .. })
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GroupPosition { group, position: 1 } => write!(f, "Winner {group}"),
            Self::GroupPosition { group, position: 2 } => write!(f, "Runner-up {group}"),
            Self::GroupPosition { group, position } => write!(f, "{} {group}", ordinal(*position)),
            Self::Seed { group, position } => write!(f, "{group}{position}"),
            Self::RoundWinner { round, sequence } => write!(f, "Winner {round}-{sequence}"),
            Self::RoundLoser { round, sequence } => write!(f, "Loser {round}-{sequence}"),
        }
    }
}
