#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AlertError {
    /// Expected failure mode: no API token configured. Callers degrade to a
    /// no-op rather than treating this as exceptional.
    #[error("Alerts API token is not configured.")]
    MissingToken,

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to parse API response: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("Alerts API error: {message}")]
    ApiError { message: String },

    #[error("Invalid data from API: missing field `{field}`.")]
    MissingField { field: String },
}

impl From<reqwest::Error> for AlertError {
    fn from(e: reqwest::Error) -> Self {
        AlertError::RequestFailed(Box::new(e))
    }
}
