//! CLI error type and exit codes.

use thiserror::Error;

/// Exit codes:
/// - 0: success
/// - 1: batch or transport error
/// - 2: configuration error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("secret retrieval failed: {0}")]
    Secret(String),

    #[error(transparent)]
    Graph(#[from] provost_graph::GraphError),

    #[error(transparent)]
    Ledger(#[from] provost_ledger::LedgerError),

    #[error(transparent)]
    Provision(#[from] provost_provision::ProvisionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Secret(_) => 2,
            CliError::Ledger(e) if e.is_invalid_mode() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_2() {
        assert_eq!(CliError::Config("missing".to_string()).exit_code(), 2);
        assert_eq!(CliError::Secret("denied".to_string()).exit_code(), 2);
        assert_eq!(
            CliError::Ledger(provost_ledger::LedgerError::InvalidMode("x".to_string()))
                .exit_code(),
            2
        );
    }

    #[test]
    fn test_runtime_errors_exit_1() {
        let err = CliError::Io(std::io::Error::other("boom"));
        assert_eq!(err.exit_code(), 1);
    }
}
