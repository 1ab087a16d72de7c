//! OAuth2 client-credentials authentication.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::{GraphConfig, GraphCredentials};
use crate::error::{GraphError, GraphResult};

/// Token response from the login endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached access token with its expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Caches the app-only access token and refreshes it near expiry.
#[derive(Debug)]
pub struct TokenCache {
    config: Arc<GraphConfig>,
    credentials: GraphCredentials,
    http_client: reqwest::Client,
    cached: Arc<RwLock<Option<CachedToken>>>,
    /// Refresh this long before the reported expiry.
    grace_period: Duration,
}

impl TokenCache {
    pub fn new(config: Arc<GraphConfig>, credentials: GraphCredentials) -> Self {
        Self {
            config,
            credentials,
            http_client: reqwest::Client::new(),
            cached: Arc::new(RwLock::new(None)),
            grace_period: Duration::minutes(5),
        }
    }

    /// Returns a valid access token, acquiring a fresh one if needed.
    #[instrument(skip(self), fields(tenant_id = %self.config.tenant_id))]
    pub async fn get_token(&self) -> GraphResult<String> {
        {
            let cache = self.cached.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    debug!("using cached token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("acquiring access token");
        let fresh = self.acquire_token().await?;
        let access_token = fresh.access_token.clone();

        {
            let mut cache = self.cached.write().await;
            *cache = Some(fresh);
        }

        Ok(access_token)
    }

    #[instrument(skip(self))]
    async fn acquire_token(&self) -> GraphResult<CachedToken> {
        let scope = self.config.default_scope();
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.credentials.client_id),
            (
                "client_secret",
                self.credentials.client_secret.expose_secret(),
            ),
            ("scope", &scope),
        ];

        let response = self
            .http_client
            .post(self.config.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "token request failed with status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        debug!(%expires_at, "token acquired");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }

    /// Drops the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        let mut cache = self.cached.write().await;
        *cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry_with_grace() {
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() + Duration::minutes(10),
        };
        assert!(!token.is_expired(Duration::minutes(5)));
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_already_expired_token() {
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        };
        assert!(token.is_expired(Duration::zero()));
    }
}
