//! Error types for the soil dashboard

/// Errors that can occur in the soil dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for soil dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
