//! Drag-to-reorder
//!
//! One controller per tab captures where the tab sat when controllers were
//! last bound. Controllers are thrown away and rebuilt after every change to
//! tab count or order, so a controller never outlives the layout it was
//! built from.

use tabstrip_dom::NodeId;

use crate::layout::TabLayout;

/// Pointer travel before a press turns into a drag, in pixels
pub const DRAG_THRESHOLD: f32 = 3.0;

/// Horizontal drag handle bound to one tab
#[derive(Debug, Clone, PartialEq)]
pub struct DragController {
    /// Tab element being controlled
    pub tab: NodeId,
    /// DOM index of the tab when bound
    pub origin_index: usize,
    /// Left offset of the tab when bound
    pub origin_x: f32,
    /// Spacing between slots when bound
    pub step: f32,
    /// Largest offset that keeps the tab inside the content element
    pub max_x: f32,
}

impl DragController {
    /// Offset of the tab after the pointer moved `dx` since the press,
    /// constrained to the content element
    pub fn position(&self, dx: f32) -> f32 {
        (self.origin_x + dx).clamp(0.0, self.max_x)
    }
}

/// Build one controller per tab from the current layout
pub fn bind(tabs: &[NodeId], layout: &TabLayout, content_width: f32, overlap: f32) -> Vec<DragController> {
    let step = layout.tab_width - overlap;
    let max_x = (content_width - layout.tab_width).max(0.0);
    tabs.iter()
        .zip(layout.positions.iter())
        .enumerate()
        .map(|(origin_index, (&tab, &origin_x))| DragController {
            tab,
            origin_index,
            origin_x,
            step,
            max_x,
        })
        .collect()
}

/// State of one press on a tab, from pointer-down to pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Controller the press landed on
    pub controller: DragController,
    /// Element under the pointer at press time
    pub target: NodeId,
    /// Pointer x at press time
    pub start_pointer_x: f32,
    /// Current offset of the tab
    pub x: f32,
    /// Set once the pointer passed the drag threshold
    pub dragging: bool,
}

impl DragSession {
    /// Start tracking a press
    pub fn new(controller: DragController, target: NodeId, pointer_x: f32) -> Self {
        let x = controller.origin_x;
        Self {
            controller,
            target,
            start_pointer_x: pointer_x,
            x,
            dragging: false,
        }
    }

    /// Track pointer movement; returns true when this move started the drag
    pub fn track(&mut self, pointer_x: f32) -> bool {
        let dx = pointer_x - self.start_pointer_x;
        self.x = self.controller.position(dx);
        if !self.dragging && dx.abs() > DRAG_THRESHOLD {
            self.dragging = true;
            return true;
        }
        false
    }
}

/// Slot whose span contains the center of a tab at offset `x`, clamped to
/// `[0, count]`. None when tabs overlap so much that slots have no width.
pub fn slot_for(x: f32, step: f32, count: usize) -> Option<usize> {
    if step <= 0.0 || !step.is_finite() {
        return None;
    }
    let slot = ((x + step / 2.0) / step).floor();
    Some(slot.clamp(0.0, count as f32) as usize)
}

/// Where a dragged tab goes in DOM order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert before this tab
    Before(NodeId),
    /// Insert right after the last tab
    AfterLast,
}

/// Placement that moves the tab at `from` to index `to`: moving left lands
/// before the tab now at `to`, moving right lands after it
pub fn placement(tabs: &[NodeId], from: usize, to: usize) -> Option<Placement> {
    if from == to || from >= tabs.len() || to >= tabs.len() {
        return None;
    }
    if to < from {
        return Some(Placement::Before(tabs[to]));
    }
    Some(match tabs.get(to + 1) {
        Some(&next) => Placement::Before(next),
        None => Placement::AfterLast,
    })
}
