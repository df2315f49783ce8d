//! Browser settings applied to the chrome document

use serde::{Deserialize, Serialize};
use tabstrip_dom::{DomTree, NodeId};

use crate::error::ChromeResult;
use crate::hooks::HostHooks;

/// Body class for a see-through toolbar
pub const TRANSPARENT_TOOLBAR: &str = "transparent-toolbar";

/// Body class for shorter tabs
pub const COMPACT_TABS: &str = "compact-tabs";

/// Settings that affect the chrome. Unknown keys in a payload are ignored
/// and missing ones are false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeSettings {
    pub experimental_transparent_toolbar: bool,
    pub experimental_compact_tabs: bool,
    pub enable_suggestions: bool,
}

impl ChromeSettings {
    /// Parse a settings payload
    pub fn from_json(payload: &str) -> ChromeResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Toggle body classes and notify the host. The downloads badge
    /// updater runs whenever the host installed one.
    pub fn apply(&self, dom: &mut DomTree, hooks: &mut HostHooks) -> ChromeResult<()> {
        if let Some(body) = find_body(dom) {
            dom.toggle_class(body, TRANSPARENT_TOOLBAR, self.experimental_transparent_toolbar)?;
            dom.toggle_class(body, COMPACT_TABS, self.experimental_compact_tabs)?;
        }
        if !self.enable_suggestions {
            hooks.close_suggestions();
        }
        hooks.update_downloads_badge();
        Ok(())
    }
}

/// Parse and apply a settings payload. A malformed payload is logged and
/// leaves the document untouched.
pub fn apply_settings(dom: &mut DomTree, hooks: &mut HostHooks, payload: &str) -> Option<ChromeSettings> {
    let settings = match ChromeSettings::from_json(payload) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("settings not applied: {}", e);
            return None;
        }
    };
    if let Err(e) = settings.apply(dom, hooks) {
        log::warn!("settings partially applied: {}", e);
    }
    log::debug!("applied {:?}", settings);
    Some(settings)
}

fn find_body(dom: &DomTree) -> Option<NodeId> {
    dom.descendants(dom.document_id())
        .into_iter()
        .find(|&id| dom.get(id).and_then(|n| n.tag_name()) == Some("body"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn document() -> (DomTree, NodeId) {
        let mut dom = DomTree::new();
        let html = dom.create_element("html");
        let body = dom.create_element("body");
        dom.append_child(dom.document_id(), html).unwrap();
        dom.append_child(html, body).unwrap();
        (dom, body)
    }

    #[test]
    fn test_compact_tabs() {
        let (mut dom, body) = document();
        let mut hooks = HostHooks::new();

        let applied = apply_settings(&mut dom, &mut hooks, r#"{"experimental_compact_tabs": true}"#);
        assert!(applied.is_some());
        assert!(dom.has_class(body, COMPACT_TABS));
        assert!(!dom.has_class(body, TRANSPARENT_TOOLBAR));

        apply_settings(&mut dom, &mut hooks, r#"{"experimental_transparent_toolbar": true}"#);
        assert!(!dom.has_class(body, COMPACT_TABS));
        assert!(dom.has_class(body, TRANSPARENT_TOOLBAR));
    }

    #[test]
    fn test_malformed_payload_changes_nothing() {
        let (mut dom, body) = document();
        dom.add_class(body, COMPACT_TABS).unwrap();
        let closed = Rc::new(Cell::new(false));
        let sink = Rc::clone(&closed);
        let mut hooks = HostHooks::new().with_close_suggestions(move || sink.set(true));

        assert_eq!(apply_settings(&mut dom, &mut hooks, "{not json"), None);
        assert!(dom.has_class(body, COMPACT_TABS));
        assert!(!closed.get());
    }

    #[test]
    fn test_suggestions_and_badge_hooks() {
        let (mut dom, _) = document();
        let closed = Rc::new(Cell::new(0));
        let badge = Rc::new(Cell::new(0));
        let (c, b) = (Rc::clone(&closed), Rc::clone(&badge));
        let mut hooks = HostHooks::new()
            .with_close_suggestions(move || c.set(c.get() + 1))
            .with_downloads_badge(move || b.set(b.get() + 1));

        apply_settings(&mut dom, &mut hooks, r#"{"enable_suggestions": true, "extra": 1}"#);
        assert_eq!((closed.get(), badge.get()), (0, 1));

        apply_settings(&mut dom, &mut hooks, "{}");
        assert_eq!((closed.get(), badge.get()), (1, 2));
    }

    #[test]
    fn test_without_body() {
        let mut dom = DomTree::new();
        let mut hooks = HostHooks::new();
        let applied = apply_settings(&mut dom, &mut hooks, r#"{"experimental_compact_tabs": true}"#);
        assert_eq!(applied.map(|s| s.experimental_compact_tabs), Some(true));
    }
}
