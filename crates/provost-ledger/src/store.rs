//! Ledger store over sqlite or Postgres.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::str::FromStr;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{debug, info, instrument};

use provost_provision::{Company, Office, ReferenceTables};

use crate::error::{LedgerError, LedgerResult};

/// Which database backs the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Local sqlite file; the usual mode for operator-driven runs.
    Sqlite,
    /// Hosted Postgres database shared across operators.
    Postgres,
}

impl StorageMode {
    /// Bind-parameter placeholder syntax for this backend.
    fn placeholder(self) -> &'static str {
        match self {
            StorageMode::Sqlite => "?",
            StorageMode::Postgres => "$1",
        }
    }
}

impl FromStr for StorageMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageMode::Sqlite),
            "postgres" | "postgresql" => Ok(StorageMode::Postgres),
            other => Err(LedgerError::InvalidMode(other.to_string())),
        }
    }
}

/// Connection to the ledger database.
///
/// All loads happen once at the start of a run; the only write is the
/// end-of-run prefix append.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: AnyPool,
    mode: StorageMode,
}

impl LedgerStore {
    /// Connects to the ledger database.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ConnectionFailed`] when the database is
    /// unreachable.
    #[instrument(skip(url))]
    pub async fn connect(mode: StorageMode, url: &str) -> LedgerResult<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(2)
            .connect(url)
            .await
            .map_err(LedgerError::ConnectionFailed)?;

        info!(?mode, "ledger connected");
        Ok(Self { pool, mode })
    }

    /// Wraps an existing pool, mainly for tests.
    #[must_use]
    pub fn from_pool(pool: AnyPool, mode: StorageMode) -> Self {
        Self { pool, mode }
    }

    /// Loads the three organizational lookup tables.
    ///
    /// # Errors
    ///
    /// Fails when any of the tables cannot be queried.
    #[instrument(skip(self))]
    pub async fn load_reference_tables(&self) -> LedgerResult<ReferenceTables> {
        let departments: HashSet<String> =
            sqlx::query_as::<_, (String,)>("SELECT Name FROM Departments")
                .fetch_all(&self.pool)
                .await
                .map_err(LedgerError::QueryFailed)?
                .into_iter()
                .map(|(name,)| name)
                .collect();

        let offices: HashMap<String, Office> = sqlx::query_as::<
            _,
            (String, String, String, String, String, String),
        >(
            "SELECT Office, Address, City, State, Country, Zip FROM Offices",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(LedgerError::QueryFailed)?
        .into_iter()
        .map(|(office, address, city, state, country, zip)| {
            (
                office,
                Office {
                    address,
                    city,
                    state,
                    country,
                    zip,
                },
            )
        })
        .collect();

        let companies: HashMap<String, Company> =
            sqlx::query_as::<_, (String, String, String)>(
                "SELECT Abbreviation, Name, Domain FROM Companies",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(LedgerError::QueryFailed)?
            .into_iter()
            .map(|(abbreviation, name, domain)| (abbreviation, Company { name, domain }))
            .collect();

        debug!(
            departments = departments.len(),
            offices = offices.len(),
            companies = companies.len(),
            "reference tables loaded"
        );

        Ok(ReferenceTables::new(departments, offices, companies))
    }

    /// Loads every prefix the ledger has ever recorded, as stored.
    ///
    /// # Errors
    ///
    /// Fails when the prefix table cannot be queried.
    #[instrument(skip(self))]
    pub async fn load_reserved_prefixes(&self) -> LedgerResult<HashSet<String>> {
        let prefixes: HashSet<String> =
            sqlx::query_as::<_, (String,)>("SELECT Prefix FROM Existing_Prefixes")
                .fetch_all(&self.pool)
                .await
                .map_err(LedgerError::QueryFailed)?
                .into_iter()
                .map(|(prefix,)| prefix)
                .collect();

        debug!(count = prefixes.len(), "ledger prefixes loaded");
        Ok(prefixes)
    }

    /// Appends newly consumed prefixes. Called exactly once, at the end of
    /// a run, with the already-deduplicated delta.
    ///
    /// # Errors
    ///
    /// Fails when an insert cannot be executed.
    #[instrument(skip(self, delta), fields(count = delta.len()))]
    pub async fn append_prefixes(&self, delta: &BTreeSet<String>) -> LedgerResult<()> {
        let statement = format!(
            "INSERT INTO Existing_Prefixes (Prefix) VALUES ({})",
            self.mode.placeholder()
        );

        for prefix in delta {
            sqlx::query(&statement)
                .bind(prefix.as_str())
                .execute(&self.pool)
                .await
                .map_err(LedgerError::QueryFailed)?;
        }

        info!(count = delta.len(), "prefix delta appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_mode_parsing() {
        assert_eq!("sqlite".parse::<StorageMode>().unwrap(), StorageMode::Sqlite);
        assert_eq!(
            "SQLITE".parse::<StorageMode>().unwrap(),
            StorageMode::Sqlite
        );
        assert_eq!(
            "postgres".parse::<StorageMode>().unwrap(),
            StorageMode::Postgres
        );
        assert_eq!(
            "postgresql".parse::<StorageMode>().unwrap(),
            StorageMode::Postgres
        );
    }

    #[test]
    fn test_invalid_storage_mode_is_fatal() {
        let err = "azure".parse::<StorageMode>().unwrap_err();
        assert!(err.is_invalid_mode());
    }

    #[test]
    fn test_placeholder_per_backend() {
        assert_eq!(StorageMode::Sqlite.placeholder(), "?");
        assert_eq!(StorageMode::Postgres.placeholder(), "$1");
    }
}
