//! User operations and the `Directory` seam implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use provost_provision::{
    AccountRequest, AccountSummary, CreatedAccount, Directory, DirectoryError,
};

use crate::client::GraphClient;
use crate::error::GraphResult;

/// Columns fetched for duplicate-name review.
const SUMMARY_SELECT_FIELDS: &str = "displayName,userPrincipalName,employeeId,mail,\
    businessPhones,mobilePhone,department,jobTitle,officeLocation,companyName";

/// Partial update payload for an existing account.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
}

/// Escapes a value for use inside an OData string literal.
fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

impl GraphClient {
    /// Creates one account.
    #[instrument(skip(self, request), fields(upn = %request.user_principal_name))]
    pub async fn create_account(&self, request: &AccountRequest) -> GraphResult<CreatedAccount> {
        info!("creating account");
        if let Ok(payload) = serde_json::to_string_pretty(request) {
            debug!(%payload, "creation payload");
        }

        let url = format!("{}/users", self.base_url());
        let created: CreatedAccount = self.post(&url, request).await?;

        info!(id = %created.id, "account created");
        Ok(created)
    }

    /// Applies a partial update to an existing account.
    #[instrument(skip(self, update))]
    pub async fn update_account(
        &self,
        user_principal_name: &str,
        update: &AccountUpdate,
    ) -> GraphResult<()> {
        let url = format!("{}/users/{}", self.base_url(), user_principal_name);
        self.patch(&url, update).await
    }

    /// Points the account's manager reference at another account.
    #[instrument(skip(self))]
    pub async fn set_manager(
        &self,
        user_principal_name: &str,
        manager_upn: &str,
    ) -> GraphResult<()> {
        let url = format!(
            "{}/users/{}/manager/$ref",
            self.base_url(),
            user_principal_name
        );
        let body = json!({
            "@odata.id": format!("{}/users/{}", self.base_url(), manager_upn),
        });
        self.put(&url, &body).await
    }

    /// Finds accounts whose given name and surname both match exactly.
    #[instrument(skip(self))]
    pub async fn find_accounts_by_name(
        &self,
        given_name: &str,
        surname: &str,
    ) -> GraphResult<Vec<AccountSummary>> {
        let filter = format!(
            "(givenName eq '{}' and surname eq '{}')",
            odata_quote(given_name),
            odata_quote(surname)
        );
        let url = format!(
            "{}/users?$filter={}&$select={}",
            self.base_url(),
            urlencoding::encode(&filter),
            SUMMARY_SELECT_FIELDS
        );
        self.get_all_pages(&url).await
    }

    /// Lists the lowercased local part of every sign-in name in the tenant.
    #[instrument(skip(self))]
    pub async fn list_account_prefixes(&self) -> GraphResult<HashSet<String>> {
        #[derive(Debug, serde::Deserialize)]
        struct UpnOnly {
            #[serde(rename = "userPrincipalName")]
            user_principal_name: String,
        }

        let url = format!("{}/users?$select=userPrincipalName", self.base_url());
        let accounts: Vec<UpnOnly> = self.get_all_pages(&url).await?;

        Ok(accounts
            .into_iter()
            .filter_map(|account| {
                account
                    .user_principal_name
                    .split('@')
                    .next()
                    .map(str::to_lowercase)
            })
            .collect())
    }

    /// Assigns a license SKU to an account.
    #[instrument(skip(self))]
    pub async fn assign_license(&self, user_principal_name: &str, sku_id: &str) -> GraphResult<()> {
        let url = format!(
            "{}/users/{}/assignLicense",
            self.base_url(),
            user_principal_name
        );
        let body = json!({
            "addLicenses": [{"skuId": sku_id}],
            "removeLicenses": [],
        });
        self.post_no_content(&url, &body).await
    }
}

#[async_trait]
impl Directory for GraphClient {
    async fn create_account(
        &self,
        request: &AccountRequest,
    ) -> Result<CreatedAccount, DirectoryError> {
        GraphClient::create_account(self, request)
            .await
            .map_err(Into::into)
    }

    async fn set_manager(
        &self,
        user_principal_name: &str,
        manager_upn: &str,
    ) -> Result<(), DirectoryError> {
        GraphClient::set_manager(self, user_principal_name, manager_upn)
            .await
            .map_err(Into::into)
    }

    async fn find_accounts_by_name(
        &self,
        given_name: &str,
        surname: &str,
    ) -> Result<Vec<AccountSummary>, DirectoryError> {
        GraphClient::find_accounts_by_name(self, given_name, surname)
            .await
            .map_err(Into::into)
    }

    async fn list_account_prefixes(&self) -> Result<HashSet<String>, DirectoryError> {
        GraphClient::list_account_prefixes(self)
            .await
            .map_err(Into::into)
    }

    async fn assign_license(
        &self,
        user_principal_name: &str,
        sku_id: &str,
    ) -> Result<(), DirectoryError> {
        GraphClient::assign_license(self, user_principal_name, sku_id)
            .await
            .map_err(Into::into)
    }
}
