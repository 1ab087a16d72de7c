//! Directory account creation payloads.

use std::collections::BTreeMap;

use serde::Serialize;

/// Initial password settings carried inside the creation payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub password: String,
    /// New hires sign in with the generated password as-is; rotation is
    /// handled by the onboarding workflow, not at first sign-in.
    pub force_change_password_next_sign_in: bool,
}

/// On-premises extension attribute block.
///
/// Only `extensionAttribute1` is populated today; it carries the
/// office-or-field classification.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionAttributes {
    #[serde(rename = "extensionAttribute1")]
    pub extension_attribute1: String,
}

/// The fully assembled payload submitted to create one directory account.
///
/// Serializes directly to the Graph `POST /users` body. Optional fields are
/// omitted rather than sent as null, and unrecognized input columns pass
/// through verbatim via `custom_attributes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub user_principal_name: String,
    pub account_enabled: bool,
    pub mail_nickname: String,
    pub mail: String,
    pub given_name: String,
    pub surname: String,
    pub company_name: String,
    pub usage_location: String,
    pub password_profile: PasswordProfile,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_premises_extension_attributes: Option<ExtensionAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Pass-through columns with no dedicated handler, serialized under
    /// their original column names.
    #[serde(flatten)]
    pub custom_attributes: BTreeMap<String, String>,
}
