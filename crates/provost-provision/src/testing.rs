//! Shared in-memory fakes for engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::account::AccountRequest;
use crate::record::InputRecord;
use crate::reference::{Company, Office, ReferenceTables};
use crate::traits::{
    AccountSummary, CreatedAccount, Directory, DirectoryError, OperatorPrompt,
};

/// Builds an [`InputRecord`] from literal column/value pairs.
pub fn record_from(pairs: &[(&str, &str)]) -> InputRecord {
    InputRecord::from_pairs(
        2,
        pairs
            .iter()
            .map(|(column, value)| (column.to_string(), Some(value.to_string()))),
    )
}

/// Reference tables with one company, one office, and two departments.
pub fn refs_fixture() -> ReferenceTables {
    let mut companies = HashMap::new();
    companies.insert(
        "ACME".to_string(),
        Company {
            name: "Acme Corporation".to_string(),
            domain: "acme.example.com".to_string(),
        },
    );

    let mut offices = HashMap::new();
    offices.insert(
        "NYC".to_string(),
        Office {
            address: "1 Wall St".to_string(),
            city: "NYC".to_string(),
            state: "NY".to_string(),
            country: "US".to_string(),
            zip: "10005".to_string(),
        },
    );

    let departments: HashSet<String> = ["Engineering".to_string(), "Sales".to_string()].into();

    ReferenceTables::new(departments, offices, companies)
}

/// In-memory directory that records every operation it performs.
#[derive(Default)]
pub struct FakeDirectory {
    existing_names: HashSet<(String, String)>,
    live_prefixes: HashSet<String>,
    log: Mutex<Vec<String>>,
}

impl FakeDirectory {
    /// A directory already containing one account with the given name pair.
    pub fn with_existing(given_name: &str, surname: &str) -> Self {
        let mut existing_names = HashSet::new();
        existing_names.insert((given_name.to_string(), surname.to_string()));
        Self {
            existing_names,
            ..Self::default()
        }
    }

    /// Sign-in names created so far, in order.
    pub fn created_upns(&self) -> Vec<String> {
        self.operation_log()
            .iter()
            .filter_map(|op| op.strip_prefix("create:").map(str::to_string))
            .collect()
    }

    /// Every operation performed, in order.
    pub fn operation_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn create_account(
        &self,
        request: &AccountRequest,
    ) -> Result<CreatedAccount, DirectoryError> {
        let mut log = self.log.lock().unwrap();
        log.push(format!("create:{}", request.user_principal_name));
        Ok(CreatedAccount {
            id: format!("obj-{}", log.len()),
            user_principal_name: request.user_principal_name.clone(),
        })
    }

    async fn set_manager(
        &self,
        user_principal_name: &str,
        manager_upn: &str,
    ) -> Result<(), DirectoryError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("manager:{user_principal_name}:{manager_upn}"));
        Ok(())
    }

    async fn find_accounts_by_name(
        &self,
        given_name: &str,
        surname: &str,
    ) -> Result<Vec<AccountSummary>, DirectoryError> {
        let key = (given_name.to_string(), surname.to_string());
        if self.existing_names.contains(&key) {
            Ok(vec![AccountSummary {
                display_name: Some(format!("{given_name} {surname}")),
                user_principal_name: Some("existing@corp.example.com".to_string()),
                employee_id: None,
                mail: None,
                business_phones: Vec::new(),
                mobile_phone: None,
                department: None,
                job_title: None,
                office_location: None,
                company_name: None,
            }])
        } else {
            Ok(Vec::new())
        }
    }

    async fn list_account_prefixes(&self) -> Result<HashSet<String>, DirectoryError> {
        Ok(self.live_prefixes.clone())
    }

    async fn assign_license(
        &self,
        user_principal_name: &str,
        sku_id: &str,
    ) -> Result<(), DirectoryError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("license:{user_principal_name}:{sku_id}"));
        Ok(())
    }
}

/// Prompt with a fixed answer for every duplicate question.
pub struct ScriptedPrompt {
    answer: bool,
    asked: Mutex<usize>,
}

impl ScriptedPrompt {
    pub fn accept_all() -> Self {
        Self {
            answer: true,
            asked: Mutex::new(0),
        }
    }

    pub fn decline_all() -> Self {
        Self {
            answer: false,
            asked: Mutex::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn confirm_duplicate(
        &self,
        _given_name: &str,
        _surname: &str,
        _matches: &[AccountSummary],
    ) -> std::io::Result<bool> {
        *self.asked.lock().unwrap() += 1;
        Ok(self.answer)
    }
}
