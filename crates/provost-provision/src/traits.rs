//! Collaborator seams consumed by the engine.
//!
//! The directory service and the operator prompt are the only two
//! collaborators the core talks to while a batch is running; both are
//! trait objects so tests can substitute in-memory fakes.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountRequest;

/// Errors surfaced by a [`Directory`] implementation.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The request never produced a usable response.
    #[error("directory request failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The directory service rejected the request.
    #[error("directory rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },
}

/// Identifier pair returned for a freshly created account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAccount {
    /// Directory object id.
    pub id: String,
    /// Sign-in name of the created account.
    #[serde(rename = "userPrincipalName")]
    pub user_principal_name: String,
}

/// Summary of an existing account, as returned by a name search.
///
/// Field set matches the columns an operator needs to judge whether a row
/// is a re-hire or a genuine duplicate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub display_name: Option<String>,
    pub user_principal_name: Option<String>,
    pub employee_id: Option<String>,
    pub mail: Option<String>,
    #[serde(default)]
    pub business_phones: Vec<String>,
    pub mobile_phone: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub office_location: Option<String>,
    pub company_name: Option<String>,
}

/// Directory service operations the engine needs.
///
/// Calls are synchronous from the batch loop's point of view: the
/// orchestrator awaits each one to completion and never issues two
/// concurrently. Implementations do not retry; a transport failure
/// propagates and halts the batch.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Creates one account and returns its directory identifiers.
    async fn create_account(&self, request: &AccountRequest)
        -> Result<CreatedAccount, DirectoryError>;

    /// Points `user_principal_name`'s manager reference at `manager_upn`.
    ///
    /// The manager must already exist, which is why the orchestrator defers
    /// these until every account in the batch has been created.
    async fn set_manager(
        &self,
        user_principal_name: &str,
        manager_upn: &str,
    ) -> Result<(), DirectoryError>;

    /// Returns accounts whose given name and surname both match exactly.
    async fn find_accounts_by_name(
        &self,
        given_name: &str,
        surname: &str,
    ) -> Result<Vec<AccountSummary>, DirectoryError>;

    /// Returns the lowercased local part of every sign-in name in the
    /// directory. Pagination is handled internally.
    async fn list_account_prefixes(&self) -> Result<HashSet<String>, DirectoryError>;

    /// Assigns a license SKU to an existing account.
    async fn assign_license(
        &self,
        user_principal_name: &str,
        sku_id: &str,
    ) -> Result<(), DirectoryError>;
}

/// Operator confirmation gate for potential duplicate accounts.
pub trait OperatorPrompt: Send + Sync {
    /// Presents the matching accounts and asks whether to create the row
    /// anyway. Returning `false` skips the row.
    fn confirm_duplicate(
        &self,
        given_name: &str,
        surname: &str,
        matches: &[AccountSummary],
    ) -> std::io::Result<bool>;
}
