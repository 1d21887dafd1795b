use serde::Deserialize;

/// Subset of the Message resource returned by the Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Error body returned by the REST API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
