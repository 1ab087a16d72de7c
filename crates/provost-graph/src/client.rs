//! Graph HTTP transport with OData error and pagination handling.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::auth::TokenCache;
use crate::config::{GraphConfig, GraphCredentials};
use crate::error::{GraphError, GraphResult};

/// OData error envelope returned by Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// OData error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "innerError")]
    pub inner_error: Option<serde_json::Value>,
}

/// Envelope for paginated collection responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph client.
///
/// One request per call: failures are mapped to [`GraphError`] and
/// propagate without retry. The response body of a failed call is logged
/// before the error is returned so the operator can see what the service
/// actually said.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    tokens: TokenCache,
    config: Arc<GraphConfig>,
}

impl GraphClient {
    /// Creates a client for the configured tenant.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the HTTP client cannot be built.
    pub fn new(config: GraphConfig, credentials: GraphCredentials) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GraphError::Config(format!("failed to create HTTP client: {e}")))?;

        let config = Arc::new(config);
        let tokens = TokenCache::new(Arc::clone(&config), credentials);

        Ok(Self {
            http_client,
            tokens,
            config,
        })
    }

    /// Base URL for versioned API requests.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Returns the token cache, mainly for invalidation in long sessions.
    #[must_use]
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// GET returning a deserialized body.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GraphResult<T> {
        let response = self.send(reqwest::Method::GET, url, None::<&()>).await?;
        response.json().await.map_err(GraphError::from)
    }

    /// POST returning a deserialized body.
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> GraphResult<T> {
        let response = self.send(reqwest::Method::POST, url, Some(body)).await?;
        response.json().await.map_err(GraphError::from)
    }

    /// POST where the response body is irrelevant.
    #[instrument(skip(self, body))]
    pub async fn post_no_content<B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> GraphResult<()> {
        self.send(reqwest::Method::POST, url, Some(body)).await?;
        Ok(())
    }

    /// PATCH; Graph answers 204 No Content on success.
    #[instrument(skip(self, body))]
    pub async fn patch<B: serde::Serialize>(&self, url: &str, body: &B) -> GraphResult<()> {
        self.send(reqwest::Method::PATCH, url, Some(body)).await?;
        Ok(())
    }

    /// PUT; used for reference assignments like `manager/$ref`.
    #[instrument(skip(self, body))]
    pub async fn put<B: serde::Serialize>(&self, url: &str, body: &B) -> GraphResult<()> {
        self.send(reqwest::Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    /// Follows `@odata.nextLink` until the collection is exhausted.
    #[instrument(skip(self))]
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        initial_url: &str,
    ) -> GraphResult<Vec<T>> {
        let mut items = Vec::new();
        let mut url = initial_url.to_string();

        loop {
            debug!(%url, "fetching page");
            let page: ODataResponse<T> = self.get(&url).await?;
            items.extend(page.value);

            match page.next_link {
                Some(next) => url = next,
                None => return Ok(items),
            }
        }
    }

    async fn send<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> GraphResult<reqwest::Response> {
        let token = self.tokens.get_token().await?;

        let mut request = self.http_client.request(method, url).bearer_auth(&token);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(%status, %url, body = %error_body, "graph request failed");

        if let Ok(odata) = serde_json::from_str::<ODataError>(&error_body) {
            return Err(GraphError::Api {
                code: odata.error.code,
                message: odata.error.message,
                inner_error: odata.error.inner_error.map(|v| v.to_string()),
            });
        }

        Err(GraphError::Api {
            code: status.to_string(),
            message: error_body,
            inner_error: None,
        })
    }
}
