//! The tab strip widget
//!
//! Every public operation takes the chrome document by `&mut` and cannot
//! fail: missing elements turn calls into no-ops, and DOM errors are logged
//! and swallowed.

use tabstrip_dom::{DomTree, NodeId, Queryable};

use crate::classes;
use crate::drag::{self, DragController, DragSession, Placement};
use crate::error::{TabsError, TabsResult};
use crate::events::{EventKind, Listeners, SubscriptionId, TabStripEvent};
use crate::frame::{FrameQueue, FrameTask, JUST_ADDED_MS};
use crate::layout::{self, StripMetrics, TabLayout};
use crate::options::TabStripOptions;
use crate::tab::{self, TabProperties};

/// A tab strip bound to a `.chrome-tabs` container element
#[derive(Debug)]
pub struct TabStrip {
    /// Container element
    el: NodeId,
    options: TabStripOptions,
    /// Value of the container's instance attribute
    instance_id: u32,
    /// Counter for tabs added without an id
    next_tab_id: u64,
    add_button: Option<NodeId>,
    /// `<style>` element holding the position rules
    style_el: Option<NodeId>,
    /// One per tab, rebuilt by `rebind`
    controllers: Vec<DragController>,
    /// Press or drag in progress
    session: Option<DragSession>,
    frames: FrameQueue,
    listeners: Listeners,
}

impl TabStrip {
    /// Bind a strip to `el`. Use `TabStripManager::create`, which hands out
    /// instance ids.
    pub(crate) fn init(dom: &mut DomTree, el: NodeId, options: TabStripOptions, instance_id: u32) -> Self {
        let mut strip = Self {
            el,
            options,
            instance_id,
            next_tab_id: 0,
            add_button: dom.query_id(el, classes::ADD_BUTTON_ID),
            style_el: None,
            controllers: Vec::new(),
            session: None,
            frames: FrameQueue::new(),
            listeners: Listeners::new(),
        };
        if let Err(e) = strip.setup(dom) {
            log::warn!("tab strip {} setup incomplete: {}", instance_id, e);
        }
        strip
    }

    fn setup(&mut self, dom: &mut DomTree) -> TabsResult<()> {
        if let (Some(add_button), Some(content)) = (self.add_button, self.content(dom)) {
            if dom.parent(add_button) != Some(content) {
                dom.append_child(content, add_button)?;
            }
        }

        dom.set_attribute(self.el, classes::INSTANCE_ATTR, self.instance_id.to_string())?;

        let style_el = dom.create_element("style");
        dom.append_child(self.el, style_el)?;
        self.style_el = Some(style_el);

        self.layout_tabs(dom)?;
        self.fix_z_indexes(dom)?;
        self.rebind(dom);

        log::debug!(
            "tab strip {} bound to {} ({} tabs)",
            self.instance_id,
            self.el,
            self.tabs(dom).len()
        );
        Ok(())
    }

    /// Container element
    pub fn element(&self) -> NodeId {
        self.el
    }

    /// Instance id stamped on the container
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Layout options
    pub fn options(&self) -> &TabStripOptions {
        &self.options
    }

    /// Add button, if the container has one
    pub fn add_button(&self) -> Option<NodeId> {
        self.add_button
    }

    /// `<style>` element holding the position rules
    pub fn style_element(&self) -> Option<NodeId> {
        self.style_el
    }

    /// The `.chrome-tabs-content` element
    pub fn content(&self, dom: &DomTree) -> Option<NodeId> {
        dom.query_class(self.el, classes::CONTENT)
    }

    /// Tab elements in DOM order
    pub fn tabs(&self, dom: &DomTree) -> Vec<NodeId> {
        dom.query_all_class(self.el, classes::TAB)
    }

    /// The current tab, if any
    pub fn current_tab(&self, dom: &DomTree) -> Option<NodeId> {
        dom.query_class(self.el, classes::TAB_CURRENT)
    }

    /// Find a tab by its `data-tab-id`
    pub fn tab_by_id(&self, dom: &DomTree, id: &str) -> Option<NodeId> {
        self.tabs(dom)
            .into_iter()
            .find(|&t| tab::tab_id(dom, t) == Some(id))
    }

    /// Drag controllers as last bound
    pub fn controllers(&self) -> &[DragController] {
        &self.controllers
    }

    /// Check if a tab is being dragged
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().map(|s| s.dragging).unwrap_or(false)
    }

    /// Check if deferred work is waiting for a frame
    pub fn has_pending_frames(&self) -> bool {
        !self.frames.is_idle()
    }

    fn is_own_tab(&self, dom: &DomTree, tab: NodeId) -> bool {
        dom.has_class(tab, classes::TAB) && dom.is_ancestor(self.el, tab)
    }

    // ---- notifications ----

    /// Register an observer for one kind of event
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&TabStripEvent) + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(kind, callback)
    }

    /// Drop an observer
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Observe clicks on the add button
    pub fn on_new_tab_request(&mut self, mut callback: impl FnMut() + 'static) -> SubscriptionId {
        self.subscribe(EventKind::NewTabRequest, move |_| callback())
    }

    /// Observe clicks on a tab's close control
    pub fn on_close_request(&mut self, callback: impl FnMut(NodeId) + 'static) -> SubscriptionId {
        self.subscribe_tab(EventKind::CloseRequest, callback)
    }

    /// Observe inserted tabs
    pub fn on_tab_added(&mut self, callback: impl FnMut(NodeId) + 'static) -> SubscriptionId {
        self.subscribe_tab(EventKind::TabAdded, callback)
    }

    /// Observe removed tabs. The element is already detached but still
    /// readable while the callback runs; it is dropped right after.
    pub fn on_tab_removed(&mut self, callback: impl FnMut(NodeId) + 'static) -> SubscriptionId {
        self.subscribe_tab(EventKind::TabRemoved, callback)
    }

    /// Observe current-tab changes
    pub fn on_active_tab_changed(&mut self, callback: impl FnMut(NodeId) + 'static) -> SubscriptionId {
        self.subscribe_tab(EventKind::ActiveTabChanged, callback)
    }

    fn subscribe_tab(
        &mut self,
        kind: EventKind,
        mut callback: impl FnMut(NodeId) + 'static,
    ) -> SubscriptionId {
        self.subscribe(kind, move |event| {
            if let Some(tab) = event.tab() {
                callback(tab);
            }
        })
    }

    fn emit(&mut self, event: TabStripEvent) {
        self.listeners.emit(&event);
    }

    // ---- layout ----

    fn metrics(&self, dom: &DomTree) -> StripMetrics {
        StripMetrics {
            content_width: self.content(dom).map(|c| dom.client_width(c)).unwrap_or(0.0),
            add_button_width: self.add_button_width(dom),
            tab_count: self.tabs(dom).len(),
        }
    }

    fn add_button_width(&self, dom: &DomTree) -> f32 {
        self.add_button.map(|b| dom.client_width(b)).unwrap_or(0.0)
    }

    /// Widths and positions for the tabs as they are now
    pub fn compute_layout(&self, dom: &DomTree) -> TabLayout {
        TabLayout::compute(&self.options, &self.metrics(dom))
    }

    /// Recompute layout after the container was resized
    pub fn resize(&mut self, dom: &mut DomTree) {
        if let Err(e) = self.layout_tabs(dom) {
            log::warn!("reflow after resize failed: {}", e);
        }
        self.rebind(dom);
    }

    /// Reflow: widths are written now, positions on the next frame
    fn layout_tabs(&mut self, dom: &mut DomTree) -> TabsResult<()> {
        self.clean_up_previously_dragged(dom)?;

        let layout = self.compute_layout(dom);
        let width = format!("{}px", layout.tab_width);
        for tab in self.tabs(dom) {
            dom.set_style(tab, "width", width.as_str())?;
        }

        if layout.positions.is_empty() {
            self.position_add_button(dom, &layout)?;
        }

        log::trace!(
            "strip {}: {} tabs at {}px",
            self.instance_id,
            layout.positions.len(),
            layout.tab_width
        );
        self.frames.request(FrameTask::WriteLayout {
            tab_width: layout.tab_width,
            positions: layout.positions,
        });
        Ok(())
    }

    fn write_layout(&mut self, dom: &mut DomTree, layout: &TabLayout) -> TabsResult<()> {
        if let Some(style_el) = self.style_el {
            let css = layout::position_rules(self.instance_id, &layout.positions);
            dom.set_text_content(style_el, &css)?;
        }
        self.position_add_button(dom, layout)
    }

    fn position_add_button(&self, dom: &mut DomTree, layout: &TabLayout) -> TabsResult<()> {
        let Some(add_button) = self.add_button else {
            return Ok(());
        };
        let Some(content) = self.content(dom) else {
            return Ok(());
        };
        let left = layout::add_button_left(
            &self.options,
            layout,
            dom.client_width(content),
            self.add_button_width(dom),
        );
        dom.set_style(add_button, "left", format!("{}px", left))?;
        dom.set_style(add_button, "right", "auto")?;
        dom.set_style(add_button, "transform", "")?;
        Ok(())
    }

    /// Stacking order: earlier tabs above later ones, the current tab above
    /// everything including the bottom bar
    fn fix_z_indexes(&self, dom: &mut DomTree) -> TabsResult<()> {
        let bottom_bar = dom.query_class(self.el, classes::BOTTOM_BAR);
        let tabs = self.tabs(dom);
        let count = tabs.len();

        for (i, &tab) in tabs.iter().enumerate() {
            let mut z_index = count - i;
            if dom.has_class(tab, classes::TAB_CURRENT) {
                if let Some(bar) = bottom_bar {
                    dom.set_style(bar, "z-index", (count + 1).to_string())?;
                }
                z_index = count + 2;
            }
            dom.set_style(tab, "z-index", z_index.to_string())?;
        }
        Ok(())
    }

    fn clean_up_previously_dragged(&self, dom: &mut DomTree) -> TabsResult<()> {
        for tab in self.tabs(dom) {
            dom.remove_class(tab, classes::TAB_JUST_DRAGGED)?;
        }
        Ok(())
    }

    // ---- tab operations ----

    /// Insert a new tab before the add button, make it current and reflow.
    /// Returns the new element, or `None` when the strip has no content
    /// element to hold it.
    pub fn add_tab(&mut self, dom: &mut DomTree, props: TabProperties) -> Option<NodeId> {
        match self.try_add_tab(dom, props) {
            Ok(tab) => Some(tab),
            Err(e) => {
                log::warn!("add_tab ignored: {}", e);
                None
            }
        }
    }

    fn try_add_tab(&mut self, dom: &mut DomTree, mut props: TabProperties) -> TabsResult<NodeId> {
        let content = self.content(dom).ok_or(TabsError::MissingContent)?;

        let id = match props.id.take() {
            Some(id) => id,
            None => {
                let id = self.next_tab_id.to_string();
                self.next_tab_id += 1;
                id
            }
        };

        let tab = tab::create_tab_element(dom)?;
        dom.set_attribute(tab, classes::TAB_ID_ATTR, id.as_str())?;
        dom.add_class(tab, classes::TAB_JUST_ADDED)?;
        self.frames.set_timeout(JUST_ADDED_MS, FrameTask::ClearJustAdded { tab });

        let before = self
            .add_button
            .filter(|&b| dom.parent(b) == Some(content));
        dom.insert_before(content, tab, before)?;

        tab::apply_properties(dom, tab, &props)?;
        log::debug!("strip {}: added tab {:?} as {}", self.instance_id, id, tab);

        self.emit(TabStripEvent::TabAdded { tab });
        self.set_current_tab(dom, tab);
        self.layout_tabs(dom)?;
        self.fix_z_indexes(dom)?;
        self.rebind(dom);
        Ok(tab)
    }

    /// Make `tab` the only current tab and raise it
    pub fn set_current_tab(&mut self, dom: &mut DomTree, tab: NodeId) {
        if !self.is_own_tab(dom, tab) {
            return;
        }
        if let Err(e) = self.try_set_current_tab(dom, tab) {
            log::warn!("set_current_tab ignored: {}", e);
        }
    }

    fn try_set_current_tab(&mut self, dom: &mut DomTree, tab: NodeId) -> TabsResult<()> {
        if let Some(current) = self.current_tab(dom) {
            dom.remove_class(current, classes::TAB_CURRENT)?;
        }
        dom.add_class(tab, classes::TAB_CURRENT)?;
        self.fix_z_indexes(dom)?;
        self.emit(TabStripEvent::ActiveTabChanged { tab });
        Ok(())
    }

    /// Remove a tab. A current tab hands its status to the tab before it,
    /// or else the one after it.
    pub fn remove_tab(&mut self, dom: &mut DomTree, tab: NodeId) {
        if !self.is_own_tab(dom, tab) {
            return;
        }
        if let Err(e) = self.try_remove_tab(dom, tab) {
            log::warn!("remove_tab incomplete: {}", e);
        }
    }

    fn try_remove_tab(&mut self, dom: &mut DomTree, tab: NodeId) -> TabsResult<()> {
        if dom.has_class(tab, classes::TAB_CURRENT) {
            let tabs = self.tabs(dom);
            let index = tabs.iter().position(|&t| t == tab);
            let previous = index.and_then(|i| i.checked_sub(1)).map(|i| tabs[i]);
            let next = index.and_then(|i| tabs.get(i + 1).copied());
            if let Some(successor) = previous.or(next) {
                self.set_current_tab(dom, successor);
            }
        }

        dom.detach(tab)?;
        log::debug!("strip {}: removed tab {}", self.instance_id, tab);
        self.emit(TabStripEvent::TabRemoved { tab });
        dom.destroy(tab)?;

        self.layout_tabs(dom)?;
        self.fix_z_indexes(dom)?;
        self.rebind(dom);
        Ok(())
    }

    /// Rewrite title, favicon and loading state of a tab
    pub fn update_tab(&mut self, dom: &mut DomTree, tab: NodeId, props: &TabProperties) {
        if !self.is_own_tab(dom, tab) {
            return;
        }
        if let Err(e) = tab::apply_properties(dom, tab, props) {
            log::warn!("update_tab ignored: {}", e);
        }
    }

    /// Route a click on `target`: the add button requests a new tab, a close
    /// control requests closing its tab, anything else on a tab selects it
    pub fn handle_click(&mut self, dom: &mut DomTree, target: NodeId) {
        if let Some(add_button) = self.add_button {
            if target == add_button || dom.is_ancestor(add_button, target) {
                self.emit(TabStripEvent::NewTabRequested);
                return;
            }
        }

        if self.is_own_tab(dom, target) {
            self.set_current_tab(dom, target);
            return;
        }

        let Some(parent) = dom.parent(target) else {
            return;
        };
        if !self.is_own_tab(dom, parent) {
            return;
        }
        if dom.has_class(target, classes::TAB_CLOSE) {
            self.emit(TabStripEvent::CloseRequested { tab: parent });
        } else if dom.has_class(target, classes::TAB_TITLE)
            || dom.has_class(target, classes::TAB_FAVICON)
        {
            self.set_current_tab(dom, parent);
        }
    }

    // ---- dragging ----

    /// Tear down all drag controllers and build fresh ones from the current
    /// layout. A press or drag in progress is abandoned.
    pub fn rebind(&mut self, dom: &mut DomTree) {
        if let Some(session) = self.session.take() {
            if session.dragging {
                if let Err(e) = self.abandon_drag(dom, session.controller.tab) {
                    log::warn!("abandoning drag failed: {}", e);
                }
            }
        }

        let tabs = self.tabs(dom);
        let layout = self.compute_layout(dom);
        let content_width = self.content(dom).map(|c| dom.client_width(c)).unwrap_or(0.0);
        self.controllers = drag::bind(&tabs, &layout, content_width, self.options.tab_overlap_distance);
    }

    fn abandon_drag(&self, dom: &mut DomTree, tab: NodeId) -> TabsResult<()> {
        dom.remove_class(self.el, classes::SORTING)?;
        if dom.get(tab).is_some() {
            dom.remove_class(tab, classes::TAB_CURRENTLY_DRAGGED)?;
            dom.set_style(tab, "transform", "")?;
        }
        Ok(())
    }

    /// Pointer pressed on `target`. Returns true when the press landed on a
    /// tab of this strip and is now tracked.
    pub fn pointer_down(&mut self, dom: &DomTree, target: NodeId, pointer_x: f32) -> bool {
        let Some(tab) = dom.closest_class(target, classes::TAB) else {
            return false;
        };
        let Some(controller) = self.controllers.iter().find(|c| c.tab == tab) else {
            return false;
        };
        self.session = Some(DragSession::new(controller.clone(), target, pointer_x));
        true
    }

    /// Pointer moved while pressed
    pub fn pointer_move(&mut self, dom: &mut DomTree, pointer_x: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let started = session.track(pointer_x);
        if !session.dragging {
            return;
        }
        let tab = session.controller.tab;
        let x = session.x;
        let step = session.controller.step;

        if let Err(e) = self.drag_to(dom, tab, x, step, started) {
            log::warn!("drag move ignored: {}", e);
        }
    }

    /// Pointer released. A press that never became a drag is a click.
    pub fn pointer_up(&mut self, dom: &mut DomTree) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !session.dragging {
            self.handle_click(dom, session.target);
            return;
        }
        if let Err(e) = self.drag_end(dom, session.controller.tab, session.x) {
            log::warn!("drag end incomplete: {}", e);
        }
    }

    fn drag_start(&mut self, dom: &mut DomTree, tab: NodeId) -> TabsResult<()> {
        self.clean_up_previously_dragged(dom)?;
        dom.add_class(tab, classes::TAB_CURRENTLY_DRAGGED)?;
        dom.add_class(self.el, classes::SORTING)?;
        self.fix_z_indexes(dom)?;
        log::debug!("strip {}: drag start on {}", self.instance_id, tab);
        Ok(())
    }

    fn drag_to(&mut self, dom: &mut DomTree, tab: NodeId, x: f32, step: f32, started: bool) -> TabsResult<()> {
        if started {
            self.drag_start(dom, tab)?;
        }
        dom.set_style(tab, "transform", layout::translate_x(x))?;
        self.drag_move(dom, tab, x, step)
    }

    fn drag_move(&mut self, dom: &mut DomTree, tab: NodeId, x: f32, step: f32) -> TabsResult<()> {
        let tabs = self.tabs(dom);
        let Some(current_index) = tabs.iter().position(|&t| t == tab) else {
            return Ok(());
        };
        let Some(slot) = drag::slot_for(x, step, tabs.len()) else {
            return Ok(());
        };
        // past the last tab means "last"
        let destination = slot.min(tabs.len() - 1);
        if destination != current_index {
            self.move_tab(dom, &tabs, tab, current_index, destination)?;
        }
        Ok(())
    }

    fn move_tab(
        &mut self,
        dom: &mut DomTree,
        tabs: &[NodeId],
        tab: NodeId,
        from: usize,
        to: usize,
    ) -> TabsResult<()> {
        let Some(parent) = dom.parent(tab) else {
            return Ok(());
        };
        let reference = match drag::placement(tabs, from, to) {
            Some(Placement::Before(next)) => Some(next),
            Some(Placement::AfterLast) => {
                let last = tabs[tabs.len() - 1];
                let siblings = dom.children(parent);
                siblings
                    .iter()
                    .position(|&s| s == last)
                    .and_then(|i| siblings.get(i + 1).copied())
            }
            None => return Ok(()),
        };
        dom.insert_before(parent, tab, reference)?;
        log::trace!("strip {}: moved {} from {} to {}", self.instance_id, tab, from, to);
        Ok(())
    }

    fn drag_end(&mut self, dom: &mut DomTree, tab: NodeId, final_x: f32) -> TabsResult<()> {
        // hold the drop position in `left` while the free transform is reset
        dom.set_style(tab, "left", format!("{}px", final_x))?;
        dom.set_style(tab, "transform", layout::translate_x(0.0))?;
        self.frames.request(FrameTask::SnapDropped { tab, final_x });
        log::debug!("strip {}: drag end on {} at {}px", self.instance_id, tab, final_x);
        Ok(())
    }

    // ---- frames ----

    /// Host frame tick: runs deferred layout writes, drop settling and
    /// expired timers
    pub fn animation_frame(&mut self, dom: &mut DomTree, elapsed_ms: f32) {
        for task in self.frames.begin_frame(elapsed_ms) {
            if let Err(e) = self.run_task(dom, &task) {
                log::warn!("frame task {:?} failed: {}", task, e);
            }
        }
    }

    /// Run frames until nothing is queued for the next one. Timers further
    /// out than `elapsed_ms` per frame may stay queued.
    pub fn flush_frames(&mut self, dom: &mut DomTree, elapsed_ms: f32) {
        // settling chains at most three frames; the cap only guards misuse
        for _ in 0..8 {
            if self.frames.pending_len() == 0 {
                break;
            }
            self.animation_frame(dom, elapsed_ms);
        }
    }

    fn run_task(&mut self, dom: &mut DomTree, task: &FrameTask) -> TabsResult<()> {
        match task {
            FrameTask::WriteLayout { tab_width, positions } => {
                let layout = TabLayout {
                    tab_width: *tab_width,
                    positions: positions.clone(),
                };
                self.write_layout(dom, &layout)
            }
            FrameTask::SnapDropped { tab, final_x } => {
                if !self.is_own_tab(dom, *tab) {
                    return Ok(());
                }
                dom.set_style(*tab, "left", "0")?;
                dom.set_style(*tab, "transform", layout::translate_x(*final_x))?;
                self.frames.request(FrameTask::ReleaseDropped { tab: *tab });
                Ok(())
            }
            FrameTask::ReleaseDropped { tab } => {
                if !self.is_own_tab(dom, *tab) {
                    return Ok(());
                }
                dom.remove_class(*tab, classes::TAB_CURRENTLY_DRAGGED)?;
                dom.remove_class(self.el, classes::SORTING)?;
                self.layout_tabs(dom)?;
                self.set_current_tab(dom, *tab);
                dom.add_class(*tab, classes::TAB_JUST_DRAGGED)?;
                self.frames.request(FrameTask::SettleDropped { tab: *tab });
                Ok(())
            }
            FrameTask::SettleDropped { tab } => {
                if self.is_own_tab(dom, *tab) {
                    dom.set_style(*tab, "transform", "")?;
                    dom.set_style(*tab, "left", "")?;
                }
                self.rebind(dom);
                Ok(())
            }
            FrameTask::ClearJustAdded { tab } => {
                if dom.get(*tab).is_some() {
                    dom.remove_class(*tab, classes::TAB_JUST_ADDED)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::TabStripManager;
    use std::cell::RefCell;
    use std::rc::Rc;

    const CONTENT_WIDTH: f32 = 1000.0;

    struct Fixture {
        dom: DomTree,
        strip: TabStrip,
        bottom_bar: Option<NodeId>,
        events: Rc<RefCell<Vec<TabStripEvent>>>,
    }

    fn options() -> TabStripOptions {
        TabStripOptions {
            tab_overlap_distance: 12.0,
            min_width: 45.0,
            max_width: 240.0,
            add_button_gap: 8.0,
        }
    }

    fn fixture_with(bottom_bar: bool, add_button: bool) -> Fixture {
        let mut dom = DomTree::new();
        let el = dom.create_element_with_class("div", classes::STRIP);
        let content = dom.create_element_with_class("div", classes::CONTENT);
        dom.append_child(dom.document_id(), el).unwrap();
        dom.append_child(el, content).unwrap();
        dom.set_client_width(content, CONTENT_WIDTH).unwrap();

        if add_button {
            // outside the content element, init moves it in
            let button = dom.create_element("div");
            dom.set_attribute(button, "id", classes::ADD_BUTTON_ID).unwrap();
            dom.set_client_width(button, 28.0).unwrap();
            dom.append_child(el, button).unwrap();
        }

        let bottom_bar = bottom_bar.then(|| {
            let bar = dom.create_element_with_class("div", classes::BOTTOM_BAR);
            dom.append_child(el, bar).unwrap();
            bar
        });

        let mut manager = TabStripManager::new();
        let mut strip = manager.create(&mut dom, el, options());

        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::NewTabRequest,
            EventKind::CloseRequest,
            EventKind::TabAdded,
            EventKind::TabRemoved,
            EventKind::ActiveTabChanged,
        ] {
            let sink = Rc::clone(&events);
            strip.subscribe(kind, move |e| sink.borrow_mut().push(*e));
        }

        Fixture { dom, strip, bottom_bar, events }
    }

    fn fixture() -> Fixture {
        fixture_with(true, true)
    }

    impl Fixture {
        fn add(&mut self, title: &str) -> NodeId {
            self.strip
                .add_tab(&mut self.dom, TabProperties::titled(title))
                .unwrap()
        }

        fn current_tabs(&self) -> Vec<NodeId> {
            self.strip
                .tabs(&self.dom)
                .into_iter()
                .filter(|&t| self.dom.has_class(t, classes::TAB_CURRENT))
                .collect()
        }

        fn z(&self, id: NodeId) -> Option<String> {
            self.dom.style(id, "z-index").map(str::to_string)
        }
    }

    #[test]
    fn test_init_prepares_container() {
        let f = fixture();
        let el = f.strip.element();
        let content = f.strip.content(&f.dom).unwrap();
        let add_button = f.strip.add_button().unwrap();

        assert_eq!(f.dom.parent(add_button), Some(content));
        assert_eq!(f.dom.get_attribute(el, classes::INSTANCE_ATTR), Some("0"));
        assert_eq!(f.dom.parent(f.strip.style_element().unwrap()), Some(el));
        // empty strip places the add button right away
        assert_eq!(f.dom.style(add_button, "left"), Some("8px"));
    }

    #[test]
    fn test_add_makes_newest_current() {
        let mut f = fixture();
        let mut last = None;
        for i in 0..5 {
            last = Some(f.add(&format!("Tab {}", i)));
            assert_eq!(f.current_tabs(), vec![last.unwrap()]);
        }
        assert_eq!(f.strip.tabs(&f.dom).len(), 5);
        assert_eq!(f.strip.current_tab(&f.dom), last);
    }

    #[test]
    fn test_add_inserts_before_add_button() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");
        let content = f.strip.content(&f.dom).unwrap();
        let add_button = f.strip.add_button().unwrap();

        assert_eq!(f.dom.children(content), vec![a, b, add_button]);
    }

    #[test]
    fn test_add_emits_in_order() {
        let mut f = fixture();
        let tab = f.add("A");
        assert_eq!(
            *f.events.borrow(),
            vec![
                TabStripEvent::TabAdded { tab },
                TabStripEvent::ActiveTabChanged { tab },
            ]
        );
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f
            .strip
            .add_tab(&mut f.dom, TabProperties::titled("B").with_id("custom"))
            .unwrap();
        let c = f.add("C");

        assert_eq!(tab::tab_id(&f.dom, a), Some("0"));
        assert_eq!(tab::tab_id(&f.dom, b), Some("custom"));
        assert_eq!(tab::tab_id(&f.dom, c), Some("1"));
        assert_eq!(f.strip.tab_by_id(&f.dom, "custom"), Some(b));
        assert_eq!(f.strip.tab_by_id(&f.dom, "nope"), None);
    }

    #[test]
    fn test_remove_current_prefers_previous() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");
        let c = f.add("C");
        f.strip.set_current_tab(&mut f.dom, b);

        f.strip.remove_tab(&mut f.dom, b);
        assert_eq!(f.current_tabs(), vec![a]);
        assert_eq!(f.strip.tabs(&f.dom), vec![a, c]);
        assert!(f.dom.get(b).is_none());
    }

    #[test]
    fn test_remove_first_current_falls_to_next() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");
        f.strip.set_current_tab(&mut f.dom, a);

        f.strip.remove_tab(&mut f.dom, a);
        assert_eq!(f.current_tabs(), vec![b]);
    }

    #[test]
    fn test_remove_last_current_skips_add_button() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");

        f.strip.remove_tab(&mut f.dom, b);
        assert_eq!(f.current_tabs(), vec![a]);
        assert!(!f.dom.has_class(f.strip.add_button().unwrap(), classes::TAB_CURRENT));
    }

    #[test]
    fn test_remove_only_tab_leaves_none() {
        let mut f = fixture();
        let a = f.add("A");
        f.events.borrow_mut().clear();

        f.strip.remove_tab(&mut f.dom, a);
        assert!(f.current_tabs().is_empty());
        assert_eq!(*f.events.borrow(), vec![TabStripEvent::TabRemoved { tab: a }]);
    }

    #[test]
    fn test_remove_non_current_keeps_current() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");

        f.strip.remove_tab(&mut f.dom, a);
        assert_eq!(f.current_tabs(), vec![b]);
    }

    #[test]
    fn test_on_tab_removed() {
        let mut f = fixture();
        let a = f.add("A");

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        f.strip.on_tab_removed(move |tab| *sink.borrow_mut() = Some(tab));
        f.strip.remove_tab(&mut f.dom, a);

        assert_eq!(*seen.borrow(), Some(a));
    }

    #[test]
    fn test_z_indexes() {
        let mut f = fixture();
        let a = f.add("A");
        let b = f.add("B");
        let c = f.add("C");
        f.strip.set_current_tab(&mut f.dom, b);

        assert_eq!(f.z(a).as_deref(), Some("3"));
        assert_eq!(f.z(b).as_deref(), Some("5"));
        assert_eq!(f.z(c).as_deref(), Some("1"));
        assert_eq!(f.z(f.bottom_bar.unwrap()).as_deref(), Some("4"));
    }

    #[test]
    fn test_z_indexes_without_bottom_bar() {
        let mut f = fixture_with(false, true);
        let a = f.add("A");
        let b = f.add("B");

        assert_eq!(f.z(a).as_deref(), Some("2"));
        assert_eq!(f.z(b).as_deref(), Some("4"));
    }

    #[test]
    fn test_without_add_button() {
        let mut f = fixture_with(true, false);
        let a = f.add("A");
        let b = f.add("B");
        f.strip.flush_frames(&mut f.dom, 16.0);

        let content = f.strip.content(&f.dom).unwrap();
        assert_eq!(f.dom.children(content), vec![a, b]);
        // full 1000px for tabs: 240 + 228 + 8 fits
        assert_eq!(f.dom.style(a, "width"), Some("240px"));
    }

    #[test]
    fn test_reflow_writes_widths_then_positions() {
        let mut f = fixture();
        let content = f.strip.content(&f.dom).unwrap();
        f.dom.set_client_width(content, 500.0).unwrap();
        let tabs: Vec<NodeId> = (0..3).map(|i| f.add(&format!("{}", i))).collect();

        let style_el = f.strip.style_element().unwrap();
        let layout = f.strip.compute_layout(&f.dom);
        assert!((layout.tab_width - 162.666_67).abs() < 0.01);
        assert_eq!(f.dom.style(tabs[0], "width"), Some(format!("{}px", layout.tab_width).as_str()));

        f.strip.animation_frame(&mut f.dom, 16.0);
        let css = f.dom.text_content(style_el);
        assert_eq!(css, layout::position_rules(0, &layout.positions));

        let add_button = f.strip.add_button().unwrap();
        let expected = layout::add_button_left(&options(), &layout, 500.0, 28.0);
        assert_eq!(f.dom.style(add_button, "left"), Some(format!("{}px", expected).as_str()));
        assert_eq!(f.dom.style(add_button, "right"), Some("auto"));
    }

    #[test]
    fn test_resize_reflows() {
        let mut f = fixture();
        let a = f.add("A");
        f.add("B");
        assert_eq!(f.dom.style(a, "width"), Some("240px"));

        let content = f.strip.content(&f.dom).unwrap();
        f.dom.set_client_width(content, 300.0).unwrap();
        f.strip.resize(&mut f.dom);

        let width: f32 = f.dom.style(a, "width").unwrap().trim_end_matches("px").parse().unwrap();
        assert!(width < 240.0 && width >= 45.0);
    }

    #[test]
    fn test_update_tab() {
        let mut f = fixture();
        let a = f.add("A");
        f.strip.update_tab(
            &mut f.dom,
            a,
            &TabProperties::titled("Loaded").with_favicon("https://example.com/favicon.ico"),
        );

        let title = f.dom.query_class(a, classes::TAB_TITLE).unwrap();
        assert_eq!(f.dom.text_content(title), "Loaded");
    }

    #[test]
    fn test_just_added_flag_expires() {
        let mut f = fixture();
        let a = f.add("A");
        assert!(f.dom.has_class(a, classes::TAB_JUST_ADDED));

        f.strip.animation_frame(&mut f.dom, 300.0);
        assert!(f.dom.has_class(a, classes::TAB_JUST_ADDED));
        f.strip.animation_frame(&mut f.dom, 200.0);
        assert!(!f.dom.has_class(a, classes::TAB_JUST_ADDED));
    }

    #[test]
    fn test_clicks() {
        let mut f = fixture();
        let a = f.add("A");
        f.add("B");
        f.events.borrow_mut().clear();

        let title = f.dom.query_class(a, classes::TAB_TITLE).unwrap();
        f.strip.handle_click(&mut f.dom, title);
        assert_eq!(f.strip.current_tab(&f.dom), Some(a));

        let close = f.dom.query_class(a, classes::TAB_CLOSE).unwrap();
        f.strip.handle_click(&mut f.dom, close);

        let add_button = f.strip.add_button().unwrap();
        f.strip.handle_click(&mut f.dom, add_button);

        assert_eq!(
            *f.events.borrow(),
            vec![
                TabStripEvent::ActiveTabChanged { tab: a },
                TabStripEvent::CloseRequested { tab: a },
                TabStripEvent::NewTabRequested,
            ]
        );
    }

    #[test]
    fn test_press_without_drag_is_click() {
        let mut f = fixture();
        let a = f.add("A");
        f.add("B");

        assert!(f.strip.pointer_down(&f.dom, a, 10.0));
        f.strip.pointer_move(&mut f.dom, 12.0);
        assert!(!f.strip.is_dragging());
        f.strip.pointer_up(&mut f.dom);

        assert_eq!(f.strip.current_tab(&f.dom), Some(a));
        assert!(!f.dom.has_class(f.strip.element(), classes::SORTING));
    }

    #[test]
    fn test_pointer_down_outside_tabs() {
        let mut f = fixture();
        f.add("A");
        let add_button = f.strip.add_button().unwrap();
        assert!(!f.strip.pointer_down(&f.dom, add_button, 10.0));
    }

    fn drag(f: &mut Fixture, tab: NodeId, dx: f32) {
        let controller = f.strip.controllers().iter().find(|c| c.tab == tab).unwrap().clone();
        let start = controller.origin_x + 20.0;
        assert!(f.strip.pointer_down(&f.dom, tab, start));
        f.strip.pointer_move(&mut f.dom, start + dx);
        f.strip.pointer_up(&mut f.dom);
        f.strip.flush_frames(&mut f.dom, 16.0);
    }

    #[test]
    fn test_drag_to_every_slot() {
        let count = 4;
        for from in 0..count {
            for to in 0..count {
                let mut f = fixture();
                let tabs: Vec<NodeId> = (0..count).map(|i| f.add(&format!("{}", i))).collect();
                f.strip.flush_frames(&mut f.dom, 16.0);

                let step = f.strip.controllers()[0].step;
                drag(&mut f, tabs[from], (to as f32 - from as f32) * step);

                let order = f.strip.tabs(&f.dom);
                assert_eq!(
                    order.iter().position(|&t| t == tabs[from]),
                    Some(to),
                    "dragging {} to {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_drag_after_resize_uses_new_slots() {
        let mut f = fixture();
        let tabs: Vec<NodeId> = (0..3).map(|i| f.add(&format!("{}", i))).collect();
        f.strip.flush_frames(&mut f.dom, 16.0);

        let content = f.strip.content(&f.dom).unwrap();
        f.dom.set_client_width(content, 300.0).unwrap();
        f.strip.resize(&mut f.dom);
        f.strip.flush_frames(&mut f.dom, 16.0);

        let layout = f.strip.compute_layout(&f.dom);
        let step = layout.tab_width - options().tab_overlap_distance;
        assert_eq!(f.strip.controllers()[0].step, step);

        drag(&mut f, tabs[0], 2.0 * step);
        assert_eq!(f.strip.tabs(&f.dom), vec![tabs[1], tabs[2], tabs[0]]);
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut f = fixture();
        let tabs: Vec<NodeId> = (0..3).map(|i| f.add(&format!("{}", i))).collect();
        f.strip.set_current_tab(&mut f.dom, tabs[2]);
        f.strip.flush_frames(&mut f.dom, 16.0);
        let el = f.strip.element();
        let step = f.strip.controllers()[0].step;

        assert!(f.strip.pointer_down(&f.dom, tabs[0], 30.0));
        f.strip.pointer_move(&mut f.dom, 30.0 + step);
        assert!(f.strip.is_dragging());
        assert!(f.dom.has_class(tabs[0], classes::TAB_CURRENTLY_DRAGGED));
        assert!(f.dom.has_class(el, classes::SORTING));
        assert_eq!(f.dom.style(tabs[0], "transform"), Some(layout::translate_x(step).as_str()));
        // reordered during the move, not at the end
        assert_eq!(f.strip.tabs(&f.dom), vec![tabs[1], tabs[0], tabs[2]]);

        f.strip.pointer_up(&mut f.dom);
        assert_eq!(f.dom.style(tabs[0], "left"), Some(format!("{}px", step).as_str()));
        assert_eq!(f.dom.style(tabs[0], "transform"), Some("translate3d(0px, 0, 0)"));

        f.strip.animation_frame(&mut f.dom, 16.0);
        assert_eq!(f.dom.style(tabs[0], "left"), Some("0"));
        assert_eq!(f.dom.style(tabs[0], "transform"), Some(layout::translate_x(step).as_str()));

        f.strip.animation_frame(&mut f.dom, 16.0);
        assert!(!f.dom.has_class(tabs[0], classes::TAB_CURRENTLY_DRAGGED));
        assert!(!f.dom.has_class(el, classes::SORTING));
        assert!(f.dom.has_class(tabs[0], classes::TAB_JUST_DRAGGED));
        assert_eq!(f.strip.current_tab(&f.dom), Some(tabs[0]));

        f.strip.animation_frame(&mut f.dom, 16.0);
        assert_eq!(f.dom.style(tabs[0], "transform"), None);
        assert_eq!(f.dom.style(tabs[0], "left"), None);
        let rebound = f.strip.controllers().iter().find(|c| c.tab == tabs[0]).unwrap();
        assert_eq!(rebound.origin_index, 1);
        assert_eq!(rebound.origin_x, step);

        // cleared when the next drag starts
        assert!(f.strip.pointer_down(&f.dom, tabs[2], 500.0));
        f.strip.pointer_move(&mut f.dom, 490.0);
        assert!(!f.dom.has_class(tabs[0], classes::TAB_JUST_DRAGGED));
    }

    #[test]
    fn test_drag_is_contained() {
        let mut f = fixture();
        let tabs: Vec<NodeId> = (0..2).map(|i| f.add(&format!("{}", i))).collect();
        f.strip.flush_frames(&mut f.dom, 16.0);

        assert!(f.strip.pointer_down(&f.dom, tabs[0], 30.0));
        f.strip.pointer_move(&mut f.dom, -400.0);
        assert_eq!(f.dom.style(tabs[0], "transform"), Some("translate3d(0px, 0, 0)"));
        f.strip.pointer_move(&mut f.dom, 5000.0);
        // 1000px content, 240px tabs
        assert_eq!(f.dom.style(tabs[0], "transform"), Some("translate3d(760px, 0, 0)"));
        assert_eq!(f.strip.tabs(&f.dom), vec![tabs[1], tabs[0]]);
    }

    #[test]
    fn test_topology_change_abandons_drag() {
        let mut f = fixture();
        let tabs: Vec<NodeId> = (0..3).map(|i| f.add(&format!("{}", i))).collect();
        f.strip.flush_frames(&mut f.dom, 16.0);

        assert!(f.strip.pointer_down(&f.dom, tabs[0], 30.0));
        f.strip.pointer_move(&mut f.dom, 60.0);
        assert!(f.strip.is_dragging());

        f.strip.remove_tab(&mut f.dom, tabs[2]);
        assert!(!f.strip.is_dragging());
        assert!(!f.dom.has_class(f.strip.element(), classes::SORTING));
        assert!(!f.dom.has_class(tabs[0], classes::TAB_CURRENTLY_DRAGGED));
        assert_eq!(f.strip.controllers().len(), 2);

        // the release after teardown does nothing
        f.strip.pointer_up(&mut f.dom);
        assert_eq!(f.dom.style(tabs[0], "transform"), None);
        assert_eq!(f.dom.style(tabs[0], "left"), None);
        assert_eq!(f.strip.tabs(&f.dom), vec![tabs[0], tabs[1]]);
    }

    #[test]
    fn test_foreign_elements_are_ignored() {
        let mut f = fixture();
        let a = f.add("A");
        let stray = f.dom.create_element_with_class("div", classes::TAB);
        f.events.borrow_mut().clear();

        f.strip.set_current_tab(&mut f.dom, stray);
        f.strip.remove_tab(&mut f.dom, stray);
        f.strip.update_tab(&mut f.dom, stray, &TabProperties::titled("x"));

        assert_eq!(f.strip.current_tab(&f.dom), Some(a));
        assert!(f.events.borrow().is_empty());
    }
}
