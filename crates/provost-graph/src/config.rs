//! Graph client configuration.

use secrecy::SecretString;

use crate::error::{GraphError, GraphResult};

/// Default Graph API endpoint (commercial cloud).
const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com";

/// Default login endpoint for token acquisition.
const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";

/// Default Graph API version.
const DEFAULT_API_VERSION: &str = "v1.0";

/// App-registration credentials for the client-credentials flow.
#[derive(Debug, Clone)]
pub struct GraphCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Validated Graph connection settings.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub graph_endpoint: String,
    pub login_endpoint: String,
    pub api_version: String,
}

impl GraphConfig {
    /// Starts building a configuration with default endpoints.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    /// Base URL for versioned API requests, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.graph_endpoint, self.api_version)
    }

    /// Token endpoint for this tenant.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_endpoint, self.tenant_id)
    }

    /// OAuth2 scope for the client-credentials flow.
    #[must_use]
    pub fn default_scope(&self) -> String {
        format!("{}/.default", self.graph_endpoint)
    }
}

/// Builder for [`GraphConfig`].
#[derive(Debug, Default, Clone)]
pub struct GraphConfigBuilder {
    tenant_id: Option<String>,
    graph_endpoint: Option<String>,
    login_endpoint: Option<String>,
    api_version: Option<String>,
}

impl GraphConfigBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Overrides the Graph endpoint, e.g. for a sovereign cloud or a test
    /// server.
    #[must_use]
    pub fn graph_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graph_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the login endpoint.
    #[must_use]
    pub fn login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] when the tenant id is missing or an
    /// endpoint override is blank.
    pub fn build(self) -> GraphResult<GraphConfig> {
        let tenant_id = self
            .tenant_id
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GraphError::Config("tenant_id is required".to_string()))?;

        let trim_endpoint = |endpoint: String, name: &str| -> GraphResult<String> {
            let trimmed = endpoint.trim_end_matches('/').to_string();
            if trimmed.is_empty() {
                return Err(GraphError::Config(format!("{name} must not be empty")));
            }
            Ok(trimmed)
        };

        Ok(GraphConfig {
            tenant_id,
            graph_endpoint: trim_endpoint(
                self.graph_endpoint
                    .unwrap_or_else(|| DEFAULT_GRAPH_ENDPOINT.to_string()),
                "graph_endpoint",
            )?,
            login_endpoint: trim_endpoint(
                self.login_endpoint
                    .unwrap_or_else(|| DEFAULT_LOGIN_ENDPOINT.to_string()),
                "login_endpoint",
            )?,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}
