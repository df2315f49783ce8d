//! Tabstrip Tabs - the tab strip widget
//!
//! A row of overlapping, draggable tabs with an add button, laid out from
//! the container width and kept in sync with the chrome document.

mod drag;
mod error;
mod events;
mod frame;
mod layout;
mod manager;
mod options;
mod strip;
mod tab;

pub use drag::{DragController, DragSession, DRAG_THRESHOLD};
pub use error::{TabsError, TabsResult};
pub use events::{EventKind, Listeners, SubscriptionId, TabStripEvent};
pub use frame::{FrameQueue, FrameTask, JUST_ADDED_MS};
pub use layout::{position_rules, tab_width, StripMetrics, TabLayout};
pub use manager::TabStripManager;
pub use options::TabStripOptions;
pub use strip::TabStrip;
pub use tab::{tab_id, TabProperties};

/// Class and attribute names shared with the chrome stylesheet
pub mod classes {
    pub const STRIP: &str = "chrome-tabs";
    pub const CONTENT: &str = "chrome-tabs-content";
    pub const BOTTOM_BAR: &str = "chrome-tabs-bottom-bar";
    pub const SORTING: &str = "chrome-tabs-sorting";
    pub const ADD_BUTTON_ID: &str = "chrome-tabs-add-tab";
    pub const INSTANCE_ATTR: &str = "data-chrome-tabs-instance-id";

    pub const TAB: &str = "chrome-tab";
    pub const TAB_BACKGROUND: &str = "chrome-tab-background";
    pub const TAB_FAVICON: &str = "chrome-tab-favicon";
    pub const TAB_SPINNER: &str = "chrome-tab-spinner";
    pub const TAB_TITLE: &str = "chrome-tab-title";
    pub const TAB_CLOSE: &str = "chrome-tab-close";
    pub const TAB_ID_ATTR: &str = "data-tab-id";

    pub const TAB_CURRENT: &str = "chrome-tab-current";
    pub const TAB_JUST_ADDED: &str = "chrome-tab-just-added";
    pub const TAB_JUST_DRAGGED: &str = "chrome-tab-just-dragged";
    pub const TAB_CURRENTLY_DRAGGED: &str = "chrome-tab-currently-dragged";
}
