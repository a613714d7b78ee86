//! Failures surfaced by [`super::ApiClient`].

/// Error returned by every API call.
///
/// Callers above the dialog layer collapse these into a single error flag;
/// the variants exist for logging and for the auth guard, which needs to tell
/// an expired credential apart from a transport failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure or a request that could not be built.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success HTTP status.
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The configured base URL cannot have API paths joined onto it.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The response body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The body carried `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// A report date could not be rendered for the query string.
    #[error("invalid report range: {0}")]
    Range(#[from] time::error::Format),
}

impl ApiError {
    /// Whether the backend refused the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
