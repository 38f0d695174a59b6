use thiserror::Error;

/// Failure of one request against the chat backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered, but outside the 2xx range
    #[error("API call failed: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The request never completed (DNS, refused, timeout, offline, broken stream)
    #[error("could not reach server: {message}")]
    Network { message: String },

    /// 2xx, but the body was not the JSON we expected
    #[error("invalid response from server: {reason}")]
    MalformedResponse { reason: String },

    #[error("invalid request header: {name}")]
    InvalidHeader { name: String },

    #[error("failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl ApiError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "status",
            ApiError::Network { .. } => "network",
            ApiError::MalformedResponse { .. } => "malformed",
            ApiError::InvalidHeader { .. } => "header",
            ApiError::ClientBuild { .. } => "client",
        }
    }

    /// True when the server was never reached
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::malformed(err.to_string());
        }
        if let Some(status) = err.status() {
            return ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        ApiError::Network {
            message: err.to_string(),
        }
    }
}
