use thiserror::Error;

/// Errors returned by the Mapbox client.
///
/// None of the variants carry the request URL's query string, which holds
/// the access token.
#[derive(Debug, Error)]
pub enum MapboxError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Mapbox answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl MapboxError {
    /// Wrap a `reqwest` error with its URL stripped.
    pub(crate) fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
