//! Toolbar state
//!
//! Back, forward, refresh/stop and the address bar, looked up by element id
//! once and updated in place. Missing elements turn the matching update into
//! a no-op.

use tabstrip_dom::{DomTree, NodeId, Queryable};

use crate::error::ChromeResult;

/// Element ids the toolbar binds to
pub mod ids {
    pub const BACK: &str = "back";
    pub const FORWARD: &str = "forward";
    pub const REFRESH: &str = "refresh";
    pub const STOP: &str = "stop";
    pub const ADDRESS: &str = "address";
    pub const TOGGLE_ADBLOCK: &str = "toggle-adblock";
}

/// Class marking a disabled navigation button
pub const DISABLED: &str = "disabled";

/// Class greying out the adblock indicator
pub const INACTIVE: &str = "inactive";

/// Clickable navigation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    Back,
    Forward,
    Refresh,
    Stop,
}

/// Toolbar elements of the chrome document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toolbar {
    pub back: Option<NodeId>,
    pub forward: Option<NodeId>,
    pub refresh: Option<NodeId>,
    pub stop: Option<NodeId>,
    pub address: Option<NodeId>,
    pub adblock: Option<NodeId>,
}

impl Toolbar {
    /// Which navigation button `target` is, if any
    pub fn button_for(&self, target: NodeId) -> Option<ToolbarButton> {
        let hit = Some(target);
        if hit == self.back {
            Some(ToolbarButton::Back)
        } else if hit == self.forward {
            Some(ToolbarButton::Forward)
        } else if hit == self.refresh {
            Some(ToolbarButton::Refresh)
        } else if hit == self.stop {
            Some(ToolbarButton::Stop)
        } else {
            None
        }
    }

    /// Look up the toolbar elements by id
    pub fn bind(dom: &DomTree) -> Self {
        let toolbar = Self {
            back: dom.get_element_by_id(ids::BACK),
            forward: dom.get_element_by_id(ids::FORWARD),
            refresh: dom.get_element_by_id(ids::REFRESH),
            stop: dom.get_element_by_id(ids::STOP),
            address: dom.get_element_by_id(ids::ADDRESS),
            adblock: dom.get_element_by_id(ids::TOGGLE_ADBLOCK),
        };
        log::debug!("toolbar bound: {:?}", toolbar);
        toolbar
    }

    /// Enable or disable the back button
    pub fn update_back(&self, dom: &mut DomTree, enable: bool) {
        report("update_back", set_enabled(dom, self.back, enable));
    }

    /// Enable or disable the forward button
    pub fn update_forward(&self, dom: &mut DomTree, enable: bool) {
        report("update_forward", set_enabled(dom, self.forward, enable));
    }

    /// Show stop while loading, refresh otherwise
    pub fn update_loading(&self, dom: &mut DomTree, loading: bool) {
        report("update_loading", self.set_loading(dom, loading));
    }

    fn set_loading(&self, dom: &mut DomTree, loading: bool) -> ChromeResult<()> {
        let (refresh, stop) = if loading {
            ("none", "inline-block")
        } else {
            ("inline-block", "none")
        };
        if let Some(el) = self.refresh {
            dom.set_style(el, "display", refresh)?;
        }
        if let Some(el) = self.stop {
            dom.set_style(el, "display", stop)?;
        }
        Ok(())
    }

    /// Replace the address bar text
    pub fn update_url(&self, dom: &mut DomTree, url: &str) {
        if let Some(el) = self.address {
            report("update_url", dom.set_attribute(el, "value", url).map_err(Into::into));
        }
    }

    /// Address bar text
    pub fn url<'a>(&self, dom: &'a DomTree) -> Option<&'a str> {
        dom.get_attribute(self.address?, "value")
    }

    /// Focus the address bar and select its text
    pub fn focus_address_bar(&self, dom: &mut DomTree) {
        let Some(el) = self.address else {
            return;
        };
        let result = dom.focus(el).and_then(|_| dom.select_all(el));
        report("focus_address_bar", result.map_err(Into::into));
    }

    /// Drop focus from the address bar
    pub fn blur_address_bar(&self, dom: &mut DomTree) {
        if let Some(el) = self.address {
            dom.blur(el);
        }
    }

    /// Check if the address bar has focus
    pub fn is_address_bar_focused(&self, dom: &DomTree) -> bool {
        self.address.is_some() && dom.focused() == self.address
    }

    /// Show the adblock indicator as on or off
    pub fn update_adblock_enabled(&self, dom: &mut DomTree, enabled: bool) {
        if let Some(el) = self.adblock {
            report("update_adblock_enabled", set_adblock_state(dom, el, enabled));
        }
    }
}

fn set_adblock_state(dom: &mut DomTree, el: NodeId, enabled: bool) -> ChromeResult<()> {
    dom.toggle_class(el, INACTIVE, !enabled)?;
    dom.set_attribute(el, "aria-pressed", if enabled { "true" } else { "false" })?;
    dom.set_attribute(el, "data-state", if enabled { "on" } else { "off" })?;
    Ok(())
}

fn set_enabled(dom: &mut DomTree, el: Option<NodeId>, enable: bool) -> ChromeResult<()> {
    if let Some(el) = el {
        dom.toggle_class(el, DISABLED, !enable)?;
    }
    Ok(())
}

fn report(op: &str, result: ChromeResult<()>) {
    if let Err(e) = result {
        log::warn!("{} ignored: {}", op, e);
    }
}
