use thiserror::Error;

/// Errors returned by the commerce API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}: {detail}")]
    Status {
        status: u16,
        url: String,
        /// The `detail` field of the error body, or the canonical reason.
        detail: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ApiError {
    /// HTTP status code, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Deserialize { .. } | ApiError::InvalidBaseUrl { .. } => None,
        }
    }

    /// Returns `true` for 4xx answers: the server is up but refused the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }
}
