use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Listing site returned HTTP {0}")]
    Status(u16),
}

impl ScraperError {
    /// Worth another attempt: timeouts, resets and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            ScraperError::Network(_) => true,
            ScraperError::Status(code) => *code >= 500,
            ScraperError::InvalidUrl(_) => false,
        }
    }
}
