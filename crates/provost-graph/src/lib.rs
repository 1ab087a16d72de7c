//! Microsoft Graph directory client for Provost.
//!
//! Implements the engine's `Directory` seam over the Graph REST API:
//! OAuth2 client-credentials authentication with a cached token, OData
//! pagination, and the user operations a provisioning run needs (create,
//! exact-name search, sign-in prefix listing, manager reference, partial
//! update, license assignment).
//!
//! Deliberately single-shot: there is no retry, rate limiting, or backoff
//! here. A batch run is interactive and operator-supervised; any transport
//! failure surfaces immediately and halts the run.
//!
//! # Example
//!
//! ```no_run
//! use provost_graph::{GraphClient, GraphConfig, GraphCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GraphConfig::builder()
//!     .tenant_id("your-tenant-id")
//!     .build()?;
//!
//! let credentials = GraphCredentials {
//!     client_id: "your-client-id".to_string(),
//!     client_secret: "your-client-secret".to_string().into(),
//! };
//!
//! let client = GraphClient::new(config, credentials)?;
//! let live = client.list_account_prefixes().await?;
//! println!("{} sign-in prefixes live in the tenant", live.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod users;

pub use auth::TokenCache;
pub use client::{GraphClient, ODataError, ODataResponse};
pub use config::{GraphConfig, GraphConfigBuilder, GraphCredentials};
pub use error::{GraphError, GraphResult};
pub use users::AccountUpdate;
