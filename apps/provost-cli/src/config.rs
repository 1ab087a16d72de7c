//! Environment-driven settings for a provisioning run.

use provost_ledger::StorageMode;
use secrecy::SecretString;

use crate::error::{CliError, CliResult};
use crate::secrets::SecretProvider;

/// Everything a run needs beyond its command-line arguments.
#[derive(Debug)]
pub struct Settings {
    pub tenant_id: String,
    pub client_id: String,
    /// Domain appended to each generated prefix to form the sign-in name.
    pub upn_domain: String,
    /// ISO country code for `usageLocation`; license assignment requires it.
    pub usage_location: String,
    pub db_mode: StorageMode,
    pub db_url: String,
    pub secret_provider: SecretProvider,
}

impl Settings {
    /// Loads settings from `PROVOST_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] for any missing or invalid variable.
    pub fn from_env() -> CliResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let require = |name: &str| -> CliResult<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CliError::Config(format!("{name} is not set")))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_mode: StorageMode = require("PROVOST_DB_MODE")?.parse()?;
        let db_url = match db_mode {
            StorageMode::Sqlite => {
                let path = require("PROVOST_DB_PATH")?;
                format!("sqlite://{path}")
            }
            StorageMode::Postgres => require("PROVOST_DB_URL")?,
        };

        let secret_provider = match optional("PROVOST_SECRET_PROVIDER").as_deref() {
            None | Some("env") => SecretProvider::Env {
                value: SecretString::from(require("PROVOST_CLIENT_SECRET")?),
            },
            Some("vault") => SecretProvider::Vault {
                address: require("PROVOST_VAULT_ADDR")?
                    .trim_end_matches('/')
                    .to_string(),
                token: SecretString::from(require("PROVOST_VAULT_TOKEN")?),
                mount: optional("PROVOST_VAULT_MOUNT").unwrap_or_else(|| "secret".to_string()),
                path: require("PROVOST_VAULT_PATH")?,
                field: optional("PROVOST_VAULT_FIELD")
                    .unwrap_or_else(|| "client_secret".to_string()),
            },
            Some(other) => {
                return Err(CliError::Config(format!(
                    "PROVOST_SECRET_PROVIDER must be 'env' or 'vault', got '{other}'"
                )));
            }
        };

        Ok(Self {
            tenant_id: require("PROVOST_TENANT_ID")?,
            client_id: require("PROVOST_CLIENT_ID")?,
            upn_domain: require("PROVOST_UPN_DOMAIN")?,
            usage_location: optional("PROVOST_USAGE_LOCATION")
                .unwrap_or_else(|| "US".to_string()),
            db_mode,
            db_url,
            secret_provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("PROVOST_TENANT_ID", "t-1"),
            ("PROVOST_CLIENT_ID", "app-1"),
            ("PROVOST_CLIENT_SECRET", "s3cret"),
            ("PROVOST_UPN_DOMAIN", "corp.example.com"),
            ("PROVOST_DB_MODE", "sqlite"),
            ("PROVOST_DB_PATH", "/tmp/ledger.db"),
        ])
    }

    fn settings_from(vars: &HashMap<&str, &str>) -> CliResult<Settings> {
        Settings::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_minimal_sqlite_settings() {
        let settings = settings_from(&base_vars()).unwrap();
        assert_eq!(settings.tenant_id, "t-1");
        assert_eq!(settings.db_mode, StorageMode::Sqlite);
        assert_eq!(settings.db_url, "sqlite:///tmp/ledger.db");
        assert_eq!(settings.usage_location, "US");
        assert!(matches!(
            settings.secret_provider,
            SecretProvider::Env { .. }
        ));
    }

    #[test]
    fn test_missing_required_variable() {
        let mut vars = base_vars();
        vars.remove("PROVOST_TENANT_ID");
        let err = settings_from(&vars).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_db_mode_is_fatal() {
        let mut vars = base_vars();
        vars.insert("PROVOST_DB_MODE", "azure");
        let err = settings_from(&vars).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_postgres_mode_requires_url() {
        let mut vars = base_vars();
        vars.insert("PROVOST_DB_MODE", "postgres");
        assert!(settings_from(&vars).is_err());

        vars.insert("PROVOST_DB_URL", "postgres://ledger@db/provost");
        let settings = settings_from(&vars).unwrap();
        assert_eq!(settings.db_url, "postgres://ledger@db/provost");
    }

    #[test]
    fn test_vault_provider_settings() {
        let mut vars = base_vars();
        vars.remove("PROVOST_CLIENT_SECRET");
        vars.insert("PROVOST_SECRET_PROVIDER", "vault");
        vars.insert("PROVOST_VAULT_ADDR", "https://vault.example.com/");
        vars.insert("PROVOST_VAULT_TOKEN", "tok");
        vars.insert("PROVOST_VAULT_PATH", "provost/graph-app");
        let settings = settings_from(&vars).unwrap();
        let SecretProvider::Vault {
            address,
            mount,
            path,
            field,
            ..
        } = settings.secret_provider
        else {
            panic!("expected vault provider");
        };
        assert_eq!(address, "https://vault.example.com");
        assert_eq!(mount, "secret");
        assert_eq!(path, "provost/graph-app");
        assert_eq!(field, "client_secret");
    }

    #[test]
    fn test_unknown_secret_provider_rejected() {
        let mut vars = base_vars();
        vars.insert("PROVOST_SECRET_PROVIDER", "akv");
        assert!(settings_from(&vars).is_err());
    }
}
