use thiserror::Error;

/// All errors coming from the warehouse layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the statement.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The response body could not be turned into rows.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid connection configuration: {0}")]
    InvalidConfig(String),
}

impl DbError {
    /// True when the warehouse could not be reached or refused the credentials,
    /// as opposed to rejecting a particular statement.
    pub fn is_connection(&self) -> bool {
        match self {
            DbError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            DbError::Authentication(_) | DbError::InvalidConfig(_) => true,
            _ => false,
        }
    }
}
