//! Error types for the provisioning engine.

use thiserror::Error;

use crate::traits::DirectoryError;

/// Result type alias using [`ProvisionError`].
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Failures while mapping a single input row to an account request.
///
/// Every variant is fatal for the batch: the orchestrator stops at the first
/// mapping failure rather than creating a partial, inconsistent set of
/// accounts.
#[derive(Debug, Error)]
pub enum MapError {
    /// A mandatory input column is absent or blank.
    #[error("missing mandatory field '{field}'")]
    MissingField { field: &'static str },

    /// The company abbreviation has no entry in the Companies table.
    #[error("unknown company abbreviation '{abbreviation}'")]
    UnknownCompany { abbreviation: String },

    /// The department is not on the Departments whitelist.
    #[error("invalid department '{department}'")]
    InvalidDepartment { department: String },

    /// The office code has no entry in the Offices table.
    #[error("unknown office code '{office}'")]
    UnknownOffice { office: String },

    /// Neither name part can seed a prefix.
    #[error("cannot derive an account prefix: first and last name are both empty")]
    UnusableName,
}

/// Errors that can occur while running a provisioning batch.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A row failed to map; `line` is the 1-based line in the input file.
    #[error("row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: MapError,
    },

    /// A directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The input file could not be read or parsed.
    #[error("failed to read input file: {0}")]
    Input(#[from] csv::Error),

    /// The credential artifact could not be written.
    #[error("failed to write credential output: {0}")]
    Output(#[source] csv::Error),

    /// Filesystem error while reading input or flushing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Wraps a mapping failure with the input line it occurred on.
    #[must_use]
    pub fn at_line(line: u64, source: MapError) -> Self {
        ProvisionError::Row { line, source }
    }
}
