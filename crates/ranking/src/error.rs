use thiserror::Error;

/// Errors surfaced by ranking operations.
///
/// Absent partitions and empty windows are not errors: they resolve to empty
/// result lists.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Rejected locally before any store call was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The backing store was unreachable or answered with an error.
    /// Passed through unmodified; no retry is attempted.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl RankingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RankingError::InvalidArgument(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, RankingError::StoreUnavailable(_))
    }
}

pub type Result<T, E = RankingError> = std::result::Result<T, E>;
