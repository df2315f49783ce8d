//! Tab strip error types
//!
//! None of these reach the widget's public operations, which degrade to
//! no-ops; they exist for option parsing and internal DOM plumbing.

use tabstrip_dom::DomError;
use thiserror::Error;

/// Tab strip result type
pub type TabsResult<T> = Result<T, TabsError>;

/// Tab strip errors
#[derive(Debug, Error)]
pub enum TabsError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Tab strip has no .chrome-tabs-content element")]
    MissingContent,
}
