//! Chrome document scaffold
//!
//! Builds the element skeleton the tab strip and toolbar bind to:
//!
//! ```text
//! html
//!   body
//!     div.chrome-tabs
//!       div.chrome-tabs-content
//!         div#chrome-tabs-add-tab
//!       div.chrome-tabs-bottom-bar
//!     div.toolbar
//!       div#back  div#forward  div#refresh  div#stop
//!       input#address
//!       div#toggle-adblock
//! ```

use tabstrip_dom::{DomResult, DomTree, NodeId};
use tabstrip_tabs::classes;

use crate::toolbar::{ids, Toolbar};

/// Width of the add button in pixels
pub const ADD_BUTTON_WIDTH: f32 = 28.0;

/// Elements of a freshly built chrome document
#[derive(Debug, Clone, Copy)]
pub struct ChromeDocument {
    pub body: NodeId,
    /// The `.chrome-tabs` container
    pub strip: NodeId,
    pub content: NodeId,
    pub add_button: NodeId,
    pub bottom_bar: NodeId,
    pub toolbar: Toolbar,
}

/// Build the chrome skeleton into `dom` with a tab area `content_width`
/// pixels wide
pub fn build_chrome_document(dom: &mut DomTree, content_width: f32) -> DomResult<ChromeDocument> {
    let html = dom.create_element("html");
    let body = dom.create_element("body");
    dom.append_child(dom.document_id(), html)?;
    dom.append_child(html, body)?;

    let strip = dom.create_element_with_class("div", classes::STRIP);
    let content = dom.create_element_with_class("div", classes::CONTENT);
    let add_button = dom.create_element("div");
    dom.set_attribute(add_button, "id", classes::ADD_BUTTON_ID)?;
    let bottom_bar = dom.create_element_with_class("div", classes::BOTTOM_BAR);

    dom.append_child(body, strip)?;
    dom.append_child(strip, content)?;
    dom.append_child(content, add_button)?;
    dom.append_child(strip, bottom_bar)?;
    dom.set_client_width(content, content_width)?;
    dom.set_client_width(add_button, ADD_BUTTON_WIDTH)?;

    let bar = dom.create_element_with_class("div", "toolbar");
    dom.append_child(body, bar)?;
    for id in [ids::BACK, ids::FORWARD, ids::REFRESH, ids::STOP, ids::ADDRESS, ids::TOGGLE_ADBLOCK] {
        let tag = if id == ids::ADDRESS { "input" } else { "div" };
        let el = dom.create_element(tag);
        dom.set_attribute(el, "id", id)?;
        dom.append_child(bar, el)?;
    }

    Ok(ChromeDocument {
        body,
        strip,
        content,
        add_button,
        bottom_bar,
        toolbar: Toolbar::bind(dom),
    })
}
