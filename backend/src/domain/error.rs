use thiserror::Error;

/// Errors surfaced by the account service
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested account does not exist
    #[error("Account not found")]
    NotFound,

    /// The store failed; carried through unchanged
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
