//! Tabstrip Chrome - browser window glue
//!
//! Toolbar updates, settings, favicon URLs and the controller that keeps
//! per-tab browser state in step with the tab strip.

mod document;
mod error;
mod favicon;
mod hooks;
mod navigation;
mod settings;
mod toolbar;
mod ui;

pub use document::{build_chrome_document, ChromeDocument, ADD_BUTTON_WIDTH};
pub use error::{ChromeError, ChromeResult};
pub use favicon::{origin_of, FaviconCache};
pub use hooks::HostHooks;
pub use navigation::NavigationState;
pub use settings::{apply_settings, ChromeSettings, COMPACT_TABS, TRANSPARENT_TOOLBAR};
pub use toolbar::{ids, Toolbar, ToolbarButton, DISABLED, INACTIVE};
pub use ui::{BrowserUi, Shortcut, TabState, UiConfig, NEW_TAB_TITLE};
