//! Error types for the Graph client.

use thiserror::Error;

/// Result type alias using [`GraphError`].
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur when talking to Microsoft Graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// OAuth2 token acquisition failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Graph returned an OData error body.
    #[error("Graph API error: {code} - {message}")]
    Api {
        code: String,
        message: String,
        inner_error: Option<String>,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<GraphError> for provost_provision::DirectoryError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Api {
                code,
                message,
                inner_error: _,
            } => provost_provision::DirectoryError::Rejected { code, message },
            other => provost_provision::DirectoryError::Transport {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
