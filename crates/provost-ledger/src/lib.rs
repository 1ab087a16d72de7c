//! SQL-backed prefix ledger and reference tables for Provost.
//!
//! The ledger database holds two kinds of data: the organizational lookup
//! tables consulted while mapping rows (departments, offices, companies)
//! and the `Existing_Prefixes` table recording every account-name prefix
//! ever issued, independent of what is currently live in the directory.
//!
//! Two storage modes are supported: a local sqlite file and a hosted
//! Postgres database. Both go through the same query path via sqlx's `Any`
//! driver.

mod error;
mod store;

pub use error::{LedgerError, LedgerResult};
pub use store::{LedgerStore, StorageMode};
