use thiserror::Error;

use crate::traits::MatchRepositoryError;

#[derive(Debug, Clone, Error)]
pub enum BracketApiError {
    #[error("{0}")]
    RepositoryError(#[from] MatchRepositoryError),
    #[error("At least one team per group must qualify, but {0} was requested")]
    InvalidQualifierCount(usize),
    #[error("Scores cannot be negative. Got {0}-{1}")]
    InvalidScore(i64, i64),
}
