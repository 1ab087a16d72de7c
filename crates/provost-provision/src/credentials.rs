//! Credential accumulation and the end-of-run output artifact.

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use crate::error::{ProvisionError, ProvisionResult};

/// Ordered, write-once mapping of sign-in name to generated password.
///
/// Accumulated across the batch and flushed exactly once at the end of the
/// run; there is no incremental persistence.
#[derive(Debug, Default)]
pub struct CredentialLedger {
    entries: Vec<(String, String)>,
    seen: HashSet<String>,
}

impl CredentialLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one credential pair. Entries are write-once: a second write
    /// for the same sign-in name is ignored and logged.
    pub fn record(&mut self, user_principal_name: String, password: String) {
        if !self.seen.insert(user_principal_name.clone()) {
            warn!(upn = %user_principal_name, "duplicate credential entry ignored");
            return;
        }
        self.entries.push((user_principal_name, password));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, user_principal_name: &str) -> bool {
        self.seen.contains(user_principal_name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(upn, password)| (upn.as_str(), password.as_str()))
    }

    /// Writes the two-column `Key,Value` artifact, replacing any previous
    /// file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or a row cannot be written.
    pub fn write_csv(&self, path: &Path) -> ProvisionResult<()> {
        let mut writer = csv::Writer::from_path(path).map_err(ProvisionError::Output)?;
        writer
            .write_record(["Key", "Value"])
            .map_err(ProvisionError::Output)?;
        for (upn, password) in &self.entries {
            writer
                .write_record([upn.as_str(), password.as_str()])
                .map_err(ProvisionError::Output)?;
        }
        writer.flush()?;
        Ok(())
    }
}
