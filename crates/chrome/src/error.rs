//! Chrome error types

use tabstrip_dom::DomError;
use thiserror::Error;

/// Chrome result type
pub type ChromeResult<T> = Result<T, ChromeError>;

/// Chrome errors
#[derive(Debug, Error)]
pub enum ChromeError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Malformed settings: {0}")]
    MalformedSettings(#[from] serde_json::Error),
}
