//! Row-to-account mapping.
//!
//! Walks one input record's fields, applies per-field dispatch rules,
//! resolves company/office/department cross-references, and assembles the
//! creation payload together with any deferred post-creation assignments.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::account::{AccountRequest, ExtensionAttributes, PasswordProfile};
use crate::error::{MapError, ProvisionError, ProvisionResult};
use crate::password::generate_password;
use crate::prefix;
use crate::record::InputRecord;
use crate::reference::ReferenceTables;
use crate::traits::{Directory, OperatorPrompt};

/// Per-run settings the mapper needs beyond the reference tables.
#[derive(Debug, Clone, Copy)]
pub struct MapperContext<'a> {
    pub refs: &'a ReferenceTables,
    /// Domain appended to the prefix to form the sign-in name.
    pub upn_domain: &'a str,
    /// ISO country code written into `usageLocation`.
    pub usage_location: &'a str,
}

/// A mapped row ready for submission, plus its deferred assignments.
#[derive(Debug)]
pub struct MappedRow {
    /// The prefix minted for this row. Not yet reserved; the orchestrator
    /// commits it to the shared set after the account is created.
    pub prefix: String,
    pub request: AccountRequest,
    /// Manager sign-in name, applied after the whole creation pass.
    pub manager_upn: Option<String>,
    /// License SKU to assign after creation.
    pub license_sku_id: Option<String>,
}

/// What became of one input row.
#[derive(Debug)]
pub enum RowOutcome {
    /// The row mapped cleanly and should be submitted.
    Ready(Box<MappedRow>),
    /// The operator declined a potential duplicate; nothing was reserved.
    Skipped { given_name: String, surname: String },
}

fn mandatory<'r>(record: &'r InputRecord, field: &'static str) -> ProvisionResult<&'r str> {
    record
        .get(field)
        .ok_or_else(|| ProvisionError::at_line(record.line_number(), MapError::MissingField { field }))
}

/// Maps one input record to an account creation request.
///
/// The reserved set is consulted for prefix generation but never mutated
/// here; on a duplicate decline the candidate prefix is simply dropped.
///
/// # Errors
///
/// Mapping failures ([`MapError`]) are wrapped with the record's line
/// number and abort the batch. Directory failures from the duplicate
/// search propagate unchanged.
pub async fn map_row(
    record: &InputRecord,
    ctx: &MapperContext<'_>,
    reserved: &HashSet<String>,
    directory: &dyn Directory,
    prompt: &dyn OperatorPrompt,
) -> ProvisionResult<RowOutcome> {
    let line = record.line_number();

    let first_name = mandatory(record, "firstName")?.to_string();
    let last_name = mandatory(record, "lastName")?.to_string();
    let abbreviation = mandatory(record, "companyAbbreviation")?.to_string();

    let company = ctx.refs.companies.get(&abbreviation).ok_or_else(|| {
        ProvisionError::at_line(line, MapError::UnknownCompany {
            abbreviation: abbreviation.clone(),
        })
    })?;

    let prefix = prefix::generate(&first_name, &last_name, reserved)
        .map_err(|e| ProvisionError::at_line(line, e))?;

    let mut request = AccountRequest {
        user_principal_name: format!("{prefix}@{}", ctx.upn_domain),
        account_enabled: true,
        mail_nickname: prefix.clone(),
        mail: format!("{prefix}@{}", company.domain),
        given_name: first_name.clone(),
        surname: last_name.clone(),
        company_name: company.name.clone(),
        usage_location: ctx.usage_location.to_string(),
        password_profile: PasswordProfile {
            password: String::new(),
            force_change_password_next_sign_in: false,
        },
        business_phones: None,
        on_premises_extension_attributes: None,
        department: None,
        office_location: None,
        street_address: None,
        city: None,
        state: None,
        country: None,
        postal_code: None,
        custom_attributes: BTreeMap::new(),
    };

    let mut manager_upn = None;
    let mut license_sku_id = None;

    for (column, value) in record.fields() {
        let Some(value) = value else { continue };

        match column {
            // Consumed by the mandatory pass above.
            "firstName" | "lastName" | "companyAbbreviation" => {}
            "officePhone" => {
                request.business_phones = Some(vec![value.to_string()]);
            }
            "officeOrField" => {
                request.on_premises_extension_attributes = Some(ExtensionAttributes {
                    extension_attribute1: value.to_string(),
                });
            }
            "department" => {
                if !ctx.refs.departments.contains(value) {
                    return Err(ProvisionError::at_line(
                        line,
                        MapError::InvalidDepartment {
                            department: value.to_string(),
                        },
                    ));
                }
                request.department = Some(value.to_string());
            }
            "Office" => {
                let office = ctx.refs.offices.get(value).ok_or_else(|| {
                    ProvisionError::at_line(line, MapError::UnknownOffice {
                        office: value.to_string(),
                    })
                })?;
                request.office_location = Some(value.to_string());
                request.street_address = Some(office.address.clone());
                request.city = Some(office.city.clone());
                request.state = Some(office.state.clone());
                request.country = Some(office.country.clone());
                request.postal_code = Some(office.zip.clone());
            }
            "manager" => {
                manager_upn = Some(value.to_string());
            }
            "licenseSkuId" => {
                license_sku_id = Some(value.to_string());
            }
            other => {
                request
                    .custom_attributes
                    .insert(other.to_string(), value.to_string());
            }
        }
    }

    let matches = directory
        .find_accounts_by_name(&first_name, &last_name)
        .await?;
    if !matches.is_empty() {
        info!(
            given_name = %first_name,
            surname = %last_name,
            count = matches.len(),
            "potential duplicate accounts found"
        );
        if !prompt.confirm_duplicate(&first_name, &last_name, &matches)? {
            return Ok(RowOutcome::Skipped {
                given_name: first_name,
                surname: last_name,
            });
        }
    }

    request.password_profile.password = generate_password();
    debug!(upn = %request.user_principal_name, prefix = %prefix, "row mapped");

    Ok(RowOutcome::Ready(Box::new(MappedRow {
        prefix,
        request,
        manager_upn,
        license_sku_id,
    })))
}
