//! Shared helpers for provost-graph integration tests.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use provost_graph::{GraphClient, GraphConfig, GraphCredentials};

pub const TEST_TENANT: &str = "test-tenant";

/// Mock Graph API server plus a client pointed at it.
pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Builds a client whose Graph and login endpoints both point at the
    /// mock server.
    pub fn client(&self) -> GraphClient {
        let config = GraphConfig::builder()
            .tenant_id(TEST_TENANT)
            .graph_endpoint(self.url())
            .login_endpoint(self.url())
            .build()
            .unwrap();
        let credentials = GraphCredentials {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string().into(),
        };
        GraphClient::new(config, credentials).unwrap()
    }

    /// Mounts the OAuth token endpoint.
    pub async fn mock_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{TEST_TENANT}/oauth2/v2.0/token")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far, for asserting on payloads.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// Wraps items in an OData collection envelope.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Minimal user object carrying only a sign-in name.
pub fn upn_entry(upn: &str) -> Value {
    json!({ "userPrincipalName": upn })
}

/// An account summary as the name search returns it.
pub fn summary_entry(display_name: &str, upn: &str) -> Value {
    json!({
        "displayName": display_name,
        "userPrincipalName": upn,
        "mail": upn,
        "businessPhones": [],
        "department": "Engineering",
        "jobTitle": "Engineer",
    })
}
