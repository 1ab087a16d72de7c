//! Error types for the ledger store.

use thiserror::Error;

/// Result type alias using [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger database errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The configured storage mode is not recognized.
    #[error("invalid storage mode '{0}' (expected 'sqlite' or 'postgres')")]
    InvalidMode(String),

    /// Failed to establish or acquire a database connection.
    #[error("ledger connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A query failed to execute.
    #[error("ledger query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),
}

impl LedgerError {
    /// Whether this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, LedgerError::ConnectionFailed(_))
    }

    /// Whether this error indicates a misconfigured storage mode.
    #[must_use]
    pub fn is_invalid_mode(&self) -> bool {
        matches!(self, LedgerError::InvalidMode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mode_display() {
        let err = LedgerError::InvalidMode("oracle".to_string());
        assert_eq!(
            err.to_string(),
            "invalid storage mode 'oracle' (expected 'sqlite' or 'postgres')"
        );
        assert!(err.is_invalid_mode());
        assert!(!err.is_connection_error());
    }
}
