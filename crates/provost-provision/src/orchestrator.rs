//! Batch orchestration.
//!
//! Drives the input rows in file order, strictly sequentially. The shared
//! reserved-prefix set is mutated at exactly one point: right after an
//! account is created, so the next row's generation call sees it.

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use crate::credentials::CredentialLedger;
use crate::error::ProvisionResult;
use crate::mapper::{map_row, MapperContext, RowOutcome};
use crate::record::InputRecord;
use crate::traits::{Directory, OperatorPrompt};

/// A relationship or entitlement applied only after the creation pass,
/// because its target may itself be an account created later in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAssignment {
    Manager {
        user_principal_name: String,
        manager_upn: String,
    },
    License {
        user_principal_name: String,
        sku_id: String,
    },
}

/// Tally of one completed batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Credentials for every account created this run, in creation order.
    pub credentials: CredentialLedger,
    pub created: usize,
    pub skipped: usize,
    /// Assignments applied after the creation pass.
    pub assignments: Vec<DeferredAssignment>,
}

/// Runs the whole batch: map, create, then drain deferred assignments.
///
/// Fatal mapping errors and directory failures abort immediately with no
/// partial persistence; accounts already created stay created and must be
/// reconciled by the operator. Skipped rows (declined duplicates) do not
/// reserve their candidate prefix and leave no credential entry.
///
/// # Errors
///
/// Propagates the first mapping or directory failure unchanged.
#[instrument(skip_all, fields(rows = records.len()))]
pub async fn run_batch(
    records: &[InputRecord],
    ctx: &MapperContext<'_>,
    reserved: &mut HashSet<String>,
    directory: &dyn Directory,
    prompt: &dyn OperatorPrompt,
) -> ProvisionResult<BatchOutcome> {
    let mut credentials = CredentialLedger::new();
    let mut assignments = Vec::new();
    let mut created = 0usize;
    let mut skipped = 0usize;

    for record in records {
        match map_row(record, ctx, reserved, directory, prompt).await? {
            RowOutcome::Skipped {
                given_name,
                surname,
            } => {
                warn!(line = record.line_number(), %given_name, %surname, "skipping row");
                skipped += 1;
            }
            RowOutcome::Ready(row) => {
                let account = directory.create_account(&row.request).await?;
                info!(
                    upn = %account.user_principal_name,
                    id = %account.id,
                    "account created"
                );

                // Commit point: the prefix becomes reserved for the rest of
                // the batch only once the account actually exists.
                reserved.insert(row.prefix.clone());
                credentials.record(
                    row.request.user_principal_name.clone(),
                    row.request.password_profile.password.clone(),
                );
                created += 1;

                if let Some(manager_upn) = row.manager_upn {
                    assignments.push(DeferredAssignment::Manager {
                        user_principal_name: row.request.user_principal_name.clone(),
                        manager_upn,
                    });
                }
                if let Some(sku_id) = row.license_sku_id {
                    assignments.push(DeferredAssignment::License {
                        user_principal_name: row.request.user_principal_name.clone(),
                        sku_id,
                    });
                }
            }
        }
    }

    for assignment in &assignments {
        match assignment {
            DeferredAssignment::Manager {
                user_principal_name,
                manager_upn,
            } => {
                directory
                    .set_manager(user_principal_name, manager_upn)
                    .await?;
                info!(upn = %user_principal_name, manager = %manager_upn, "manager assigned");
            }
            DeferredAssignment::License {
                user_principal_name,
                sku_id,
            } => {
                directory.assign_license(user_principal_name, sku_id).await?;
                info!(upn = %user_principal_name, sku = %sku_id, "license assigned");
            }
        }
    }

    info!(created, skipped, "batch complete");

    Ok(BatchOutcome {
        credentials,
        created,
        skipped,
        assignments,
    })
}
