//! Tab elements

use serde::Deserialize;
use tabstrip_dom::{DomResult, DomTree, NodeId, Queryable};

use crate::classes;

/// Visual properties of a tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TabProperties {
    /// Opaque identifier stored as `data-tab-id`
    pub id: Option<String>,
    /// Display text
    pub title: String,
    /// Favicon image URL
    pub favicon: String,
    /// Show the spinner instead of the favicon
    pub loading: bool,
}

impl TabProperties {
    /// Properties with a title and nothing else
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the favicon URL
    pub fn with_favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = favicon.into();
        self
    }

    /// Set the loading flag
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

/// Build a detached tab element:
///
/// ```text
/// div.chrome-tab
///   div.chrome-tab-background
///   div.chrome-tab-favicon
///   div.chrome-tab-spinner
///   div.chrome-tab-title
///   div.chrome-tab-close
/// ```
pub fn create_tab_element(dom: &mut DomTree) -> DomResult<NodeId> {
    let tab = dom.create_element_with_class("div", classes::TAB);
    for part in [
        classes::TAB_BACKGROUND,
        classes::TAB_FAVICON,
        classes::TAB_SPINNER,
        classes::TAB_TITLE,
        classes::TAB_CLOSE,
    ] {
        let child = dom.create_element_with_class("div", part);
        dom.append_child(tab, child)?;
    }
    Ok(tab)
}

/// Write title, favicon and loading state into a tab element. Parts missing
/// from the element are skipped.
pub fn apply_properties(dom: &mut DomTree, tab: NodeId, props: &TabProperties) -> DomResult<()> {
    if let Some(title) = dom.query_class(tab, classes::TAB_TITLE) {
        dom.set_text_content(title, &props.title)?;
    }

    let (favicon_display, spinner_display) = if props.loading {
        ("none", "inline-block")
    } else {
        ("inline-block", "none")
    };

    if let Some(favicon) = dom.query_class(tab, classes::TAB_FAVICON) {
        dom.set_style(favicon, "background-image", format!("url({})", props.favicon))?;
        dom.set_style(favicon, "display", favicon_display)?;
    }
    if let Some(spinner) = dom.query_class(tab, classes::TAB_SPINNER) {
        dom.set_style(spinner, "display", spinner_display)?;
    }
    Ok(())
}

/// Read back the `data-tab-id` of a tab element
pub fn tab_id(dom: &DomTree, tab: NodeId) -> Option<&str> {
    dom.get_attribute(tab, classes::TAB_ID_ATTR)
}
