//! Client-secret retrieval.
//!
//! The OAuth client secret either comes straight from the environment or
//! is read from HashiCorp Vault KV v2 with token authentication.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Where the Graph client secret comes from.
pub enum SecretProvider {
    /// Secret supplied directly via configuration.
    Env { value: SecretString },
    /// Secret read from a Vault KV v2 mount.
    Vault {
        address: String,
        token: SecretString,
        mount: String,
        path: String,
        field: String,
    },
}

impl std::fmt::Debug for SecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretProvider::Env { .. } => f.debug_struct("Env").finish_non_exhaustive(),
            SecretProvider::Vault {
                address,
                mount,
                path,
                field,
                ..
            } => f
                .debug_struct("Vault")
                .field("address", address)
                .field("mount", mount)
                .field("path", path)
                .field("field", field)
                .finish_non_exhaustive(),
        }
    }
}

/// KV v2 read response envelope.
#[derive(Debug, Deserialize)]
struct KvReadResponse {
    data: KvReadData,
}

#[derive(Debug, Deserialize)]
struct KvReadData {
    data: HashMap<String, serde_json::Value>,
}

impl SecretProvider {
    /// Resolves the client secret.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Secret`] when Vault is unreachable, denies the
    /// token, or the secret lacks the configured field.
    pub async fn client_secret(&self) -> CliResult<SecretString> {
        match self {
            SecretProvider::Env { value } => Ok(value.clone()),
            SecretProvider::Vault {
                address,
                token,
                mount,
                path,
                field,
            } => {
                let url = format!("{address}/v1/{mount}/data/{path}");
                debug!(%url, "reading client secret from vault");

                let client = reqwest::Client::builder()
                    .timeout(std::time::Duration::from_secs(30))
                    .build()
                    .map_err(|e| CliError::Secret(format!("failed to create HTTP client: {e}")))?;

                let response = client
                    .get(&url)
                    .header("X-Vault-Token", token.expose_secret())
                    .send()
                    .await
                    .map_err(|e| CliError::Secret(format!("vault request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    return Err(CliError::Secret(format!(
                        "vault returned status {status} for {mount}/{path}"
                    )));
                }

                let body: KvReadResponse = response
                    .json()
                    .await
                    .map_err(|e| CliError::Secret(format!("invalid vault response: {e}")))?;

                let value = body
                    .data
                    .data
                    .get(field)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        CliError::Secret(format!(
                            "field '{field}' missing from secret {mount}/{path}"
                        ))
                    })?;

                Ok(SecretString::from(value.to_string()))
            }
        }
    }
}
