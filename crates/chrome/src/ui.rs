//! Browser UI controller
//!
//! Keeps per-tab browser state next to the tab strip. Strip notifications
//! are queued on a channel while the strip runs and handled afterwards by
//! `pump`, so handlers are free to call back into the strip.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver};

use serde::Deserialize;
use tabstrip_dom::{DomTree, NodeId};
use tabstrip_tabs::{EventKind, TabProperties, TabStrip, TabStripEvent};

use crate::favicon::FaviconCache;
use crate::hooks::HostHooks;
use crate::navigation::NavigationState;
use crate::settings::{self, ChromeSettings};
use crate::toolbar::{Toolbar, ToolbarButton};

/// Title of a tab opened from the add button
pub const NEW_TAB_TITLE: &str = "New Tab";

/// Browser UI configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page new tabs open
    pub home_url: String,
    /// Initial adblock state
    pub adblock_enabled: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            home_url: String::from("https://www.google.com"),
            adblock_enabled: true,
        }
    }
}

/// Browser state of one tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabState {
    pub id: u64,
    /// Tab element in the strip
    pub element: NodeId,
    pub title: String,
    pub url: String,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Pages visited in this tab
    pub history: NavigationState,
    /// Shown in the content area
    pub visible: bool,
    /// Closed while active; dropped once another tab takes over
    pub ready_to_close: bool,
}

impl TabState {
    /// Take the current page and button state from the history
    fn follow_history(&mut self) {
        if let Some(url) = self.history.current_url() {
            self.url = url.to_string();
        }
        self.can_go_back = self.history.can_go_back();
        self.can_go_forward = self.history.can_go_forward();
    }
}

/// Keyboard shortcuts handled by the chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+T
    NewTab,
    /// Ctrl+W
    CloseTab,
    /// Ctrl+L
    FocusAddressBar,
}

/// Tab strip, toolbar and per-tab state of a browser window
#[derive(Debug)]
pub struct BrowserUi {
    strip: TabStrip,
    toolbar: Toolbar,
    hooks: HostHooks,
    favicons: FaviconCache,
    config: UiConfig,
    tabs: BTreeMap<u64, TabState>,
    active: Option<u64>,
    next_tab_id: u64,
    events: Receiver<TabStripEvent>,
    adblock_enabled: bool,
    quit_requested: bool,
}

impl BrowserUi {
    /// Take over a bound strip and the toolbar of the same document
    pub fn new(
        dom: &mut DomTree,
        mut strip: TabStrip,
        toolbar: Toolbar,
        hooks: HostHooks,
        config: UiConfig,
    ) -> Self {
        let (sender, events) = mpsc::channel();
        for kind in [
            EventKind::NewTabRequest,
            EventKind::CloseRequest,
            EventKind::TabAdded,
            EventKind::TabRemoved,
            EventKind::ActiveTabChanged,
        ] {
            let sender = sender.clone();
            strip.subscribe(kind, move |event| {
                let _ = sender.send(*event);
            });
        }

        let adblock_enabled = config.adblock_enabled;
        toolbar.update_adblock_enabled(dom, adblock_enabled);

        Self {
            strip,
            toolbar,
            hooks,
            favicons: FaviconCache::new(),
            config,
            tabs: BTreeMap::new(),
            active: None,
            next_tab_id: 0,
            events,
            adblock_enabled,
            quit_requested: false,
        }
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Id of the tab shown in the content area
    pub fn active_tab_id(&self) -> Option<u64> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&TabState> {
        self.active.and_then(|id| self.tabs.get(&id))
    }

    pub fn tab(&self, id: u64) -> Option<&TabState> {
        self.tabs.get(&id)
    }

    /// Live tabs in id order
    pub fn tabs(&self) -> impl Iterator<Item = &TabState> {
        self.tabs.values()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Set once the last tab was asked to close
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn adblock_enabled(&self) -> bool {
        self.adblock_enabled
    }

    fn id_for(&self, element: NodeId) -> Option<u64> {
        self.tabs
            .values()
            .find(|state| state.element == element)
            .map(|state| state.id)
    }

    // ---- tabs ----

    /// Open a tab on the home page and make it active
    pub fn create_new_tab(&mut self, dom: &mut DomTree) -> Option<u64> {
        let home_url = self.config.home_url.clone();
        let id = self.open_tab(dom, NEW_TAB_TITLE, &home_url, true);
        self.pump(dom);
        id
    }

    /// Open a tab for a view created by a page, such as a popup
    pub fn create_tab_for_child_view(&mut self, dom: &mut DomTree, url: &str) -> Option<u64> {
        let id = self.open_tab(dom, "", url, false);
        self.pump(dom);
        id
    }

    fn open_tab(&mut self, dom: &mut DomTree, title: &str, url: &str, loading: bool) -> Option<u64> {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let props = TabProperties::titled(title)
            .with_id(id.to_string())
            .with_favicon(self.favicons.favicon_url(url))
            .with_loading(loading);
        let element = self.strip.add_tab(dom, props)?;

        self.tabs.insert(
            id,
            TabState {
                id,
                element,
                title: title.to_string(),
                url: url.to_string(),
                loading,
                can_go_back: false,
                can_go_forward: false,
                history: NavigationState::starting_at(url),
                visible: false,
                ready_to_close: false,
            },
        );
        log::debug!("opened tab {} at {}", id, url);
        Some(id)
    }

    /// Close a tab. Closing the last tab requests quit; the active tab is
    /// kept until another tab takes over.
    pub fn close_tab(&mut self, dom: &mut DomTree, id: u64) {
        self.request_close(dom, id);
        self.pump(dom);
    }

    fn request_close(&mut self, dom: &mut DomTree, id: u64) {
        let remaining = self.tabs.len();
        let is_active = self.active == Some(id);
        let Some(state) = self.tabs.get_mut(&id) else {
            log::debug!("close of unknown tab {} ignored", id);
            return;
        };
        let element = state.element;

        if remaining == 1 {
            log::info!("last tab closed, quitting");
            self.quit_requested = true;
        }

        if is_active {
            state.ready_to_close = true;
        } else {
            self.tabs.remove(&id);
        }
        self.strip.remove_tab(dom, element);
    }

    fn activate(&mut self, dom: &mut DomTree, id: u64) {
        if self.active == Some(id) || !self.tabs.contains_key(&id) {
            return;
        }

        if let Some(previous) = self.active {
            let closing = match self.tabs.get_mut(&previous) {
                Some(state) => {
                    state.visible = false;
                    state.ready_to_close
                }
                None => false,
            };
            if closing {
                self.tabs.remove(&previous);
                log::debug!("dropped closed tab {}", previous);
            }
        }

        self.active = Some(id);
        if let Some(state) = self.tabs.get_mut(&id) {
            state.visible = true;
        }
        self.sync_toolbar(dom);
    }

    fn sync_toolbar(&mut self, dom: &mut DomTree) {
        let toolbar = self.toolbar;
        let Some(state) = self.active.and_then(|id| self.tabs.get(&id)) else {
            return;
        };
        toolbar.update_loading(dom, state.loading);
        toolbar.update_back(dom, state.can_go_back);
        toolbar.update_forward(dom, state.can_go_forward);
        toolbar.update_url(dom, &state.url);
    }

    fn refresh_tab(&mut self, dom: &mut DomTree, id: u64) {
        let Some(state) = self.tabs.get(&id) else {
            return;
        };
        let element = state.element;
        let props = TabProperties::titled(state.title.clone())
            .with_favicon(self.favicons.favicon_url(&state.url))
            .with_loading(state.loading);
        self.strip.update_tab(dom, element, &props);
    }

    /// Page title changed
    pub fn update_tab_title(&mut self, dom: &mut DomTree, id: u64, title: &str) {
        let Some(state) = self.tabs.get_mut(&id) else {
            return;
        };
        state.title = title.to_string();
        self.refresh_tab(dom, id);
    }

    /// Page URL changed. A new URL becomes a history entry.
    pub fn update_tab_url(&mut self, dom: &mut DomTree, id: u64, url: &str) {
        let Some(state) = self.tabs.get_mut(&id) else {
            return;
        };
        if state.history.current_url() != Some(url) {
            state.history.navigate_to(url);
        }
        state.follow_history();
        self.refresh_tab(dom, id);
        if self.active == Some(id) {
            self.sync_toolbar(dom);
        }
    }

    /// Loading or history state changed
    pub fn update_tab_navigation(
        &mut self,
        dom: &mut DomTree,
        id: u64,
        loading: bool,
        can_go_back: bool,
        can_go_forward: bool,
    ) {
        let Some(state) = self.tabs.get_mut(&id) else {
            return;
        };
        state.loading = loading;
        state.can_go_back = can_go_back;
        state.can_go_forward = can_go_forward;
        self.refresh_tab(dom, id);

        if self.active == Some(id) {
            self.toolbar.update_loading(dom, loading);
            self.toolbar.update_back(dom, can_go_back);
            self.toolbar.update_forward(dom, can_go_forward);
        }
    }

    /// Load `url` in the active tab
    pub fn navigate(&mut self, dom: &mut DomTree, url: &str) {
        let Some(id) = self.active else {
            return;
        };
        self.update_tab_url(dom, id, url);
        let (back, forward) = match self.tabs.get(&id) {
            Some(state) => (state.can_go_back, state.can_go_forward),
            None => return,
        };
        self.update_tab_navigation(dom, id, true, back, forward);
    }

    // ---- toolbar ----

    /// Back, forward, refresh or stop on the active tab
    pub fn press(&mut self, dom: &mut DomTree, button: ToolbarButton) {
        let Some(id) = self.active else {
            return;
        };
        let Some(state) = self.tabs.get_mut(&id) else {
            return;
        };
        match button {
            ToolbarButton::Back => {
                if state.history.go_back().is_none() {
                    return;
                }
                state.loading = true;
            }
            ToolbarButton::Forward => {
                if state.history.go_forward().is_none() {
                    return;
                }
                state.loading = true;
            }
            ToolbarButton::Refresh => state.loading = true,
            ToolbarButton::Stop => state.loading = false,
        }
        state.follow_history();
        log::debug!("{:?} on tab {}", button, id);
        self.refresh_tab(dom, id);
        self.sync_toolbar(dom);
    }

    /// Flip adblocking and refresh the indicator
    pub fn toggle_adblock(&mut self, dom: &mut DomTree) {
        self.adblock_enabled = !self.adblock_enabled;
        log::info!("adblock {}", if self.adblock_enabled { "on" } else { "off" });
        self.toolbar.update_adblock_enabled(dom, self.adblock_enabled);
    }

    /// Focus and select the address bar
    pub fn focus_address_bar(&mut self, dom: &mut DomTree) {
        self.toolbar.focus_address_bar(dom);
        self.hooks.address_bar_focused();
    }

    /// The address bar lost focus
    pub fn blur_address_bar(&mut self, dom: &mut DomTree) {
        self.toolbar.blur_address_bar(dom);
        self.hooks.address_bar_blurred();
    }

    pub fn is_address_bar_focused(&self, dom: &DomTree) -> bool {
        self.toolbar.is_address_bar_focused(dom)
    }

    /// Handle a chrome shortcut; returns true when it was consumed
    pub fn handle_shortcut(&mut self, dom: &mut DomTree, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::NewTab => {
                self.create_new_tab(dom);
            }
            Shortcut::CloseTab => {
                if let Some(id) = self.active {
                    self.close_tab(dom, id);
                }
            }
            Shortcut::FocusAddressBar => self.focus_address_bar(dom),
        }
        true
    }

    /// Apply a settings payload to the document
    pub fn apply_settings(&mut self, dom: &mut DomTree, payload: &str) -> Option<ChromeSettings> {
        settings::apply_settings(dom, &mut self.hooks, payload)
    }

    // ---- strip input ----

    pub fn click(&mut self, dom: &mut DomTree, target: NodeId) {
        if let Some(button) = self.toolbar.button_for(target) {
            self.press(dom, button);
            return;
        }
        self.strip.handle_click(dom, target);
        self.pump(dom);
    }

    pub fn pointer_down(&mut self, dom: &DomTree, target: NodeId, pointer_x: f32) -> bool {
        self.strip.pointer_down(dom, target, pointer_x)
    }

    pub fn pointer_move(&mut self, dom: &mut DomTree, pointer_x: f32) {
        self.strip.pointer_move(dom, pointer_x);
    }

    pub fn pointer_up(&mut self, dom: &mut DomTree) {
        self.strip.pointer_up(dom);
        self.pump(dom);
    }

    pub fn resize(&mut self, dom: &mut DomTree) {
        self.strip.resize(dom);
    }

    /// Host frame tick
    pub fn animation_frame(&mut self, dom: &mut DomTree, elapsed_ms: f32) {
        self.strip.animation_frame(dom, elapsed_ms);
        self.pump(dom);
    }

    /// Run frames until the strip has nothing queued for the next one
    pub fn flush_frames(&mut self, dom: &mut DomTree, elapsed_ms: f32) {
        self.strip.flush_frames(dom, elapsed_ms);
        self.pump(dom);
    }

    // ---- notifications ----

    /// Handle every queued strip notification
    pub fn pump(&mut self, dom: &mut DomTree) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(dom, event);
        }
    }

    fn handle_event(&mut self, dom: &mut DomTree, event: TabStripEvent) {
        match event {
            TabStripEvent::NewTabRequested => {
                let home_url = self.config.home_url.clone();
                self.open_tab(dom, NEW_TAB_TITLE, &home_url, true);
            }
            TabStripEvent::CloseRequested { tab } => {
                if let Some(id) = self.id_for(tab) {
                    self.request_close(dom, id);
                }
            }
            TabStripEvent::ActiveTabChanged { tab } => {
                if let Some(id) = self.id_for(tab) {
                    self.activate(dom, id);
                }
            }
            TabStripEvent::TabAdded { tab } => {
                log::trace!("strip added {}", tab);
            }
            TabStripEvent::TabRemoved { tab } => {
                // removed behind our back
                if let Some(id) = self.id_for(tab).filter(|&id| self.active != Some(id)) {
                    self.tabs.remove(&id);
                }
            }
        }
    }
}
