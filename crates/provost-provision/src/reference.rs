//! Read-only organizational lookup tables.
//!
//! Loaded once per run from the ledger store and never mutated afterwards.

use std::collections::{HashMap, HashSet};

/// Postal address details for an office code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

/// Company metadata keyed by its abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    /// Full legal name, written into `companyName`.
    pub name: String,
    /// Mail domain for addresses issued under this company.
    pub domain: String,
}

/// The three lookup sets consulted while mapping rows.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    /// Whitelist of valid department names.
    pub departments: HashSet<String>,
    /// Office code to postal address.
    pub offices: HashMap<String, Office>,
    /// Company abbreviation to name and mail domain.
    pub companies: HashMap<String, Company>,
}

impl ReferenceTables {
    /// Convenience constructor for callers assembling tables by hand.
    #[must_use]
    pub fn new(
        departments: HashSet<String>,
        offices: HashMap<String, Office>,
        companies: HashMap<String, Company>,
    ) -> Self {
        Self {
            departments,
            offices,
            companies,
        }
    }
}
