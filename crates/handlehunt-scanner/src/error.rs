use handlehunt_core::HandleError;
use handlehunt_platforms::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] HandleError),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("platform catalog error: {0}")]
    Platform(#[from] PlatformError),

    #[error("no platforms selected for scan")]
    NoPlatforms,
}

pub type Result<T> = std::result::Result<T, ScanError>;
