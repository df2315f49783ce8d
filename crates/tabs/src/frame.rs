//! Deferred DOM writes
//!
//! Stand-in for `requestAnimationFrame` and `setTimeout`: work is queued as
//! plain task values and drained when the host ticks a frame. Tasks queued
//! while a frame runs wait for the following frame.

use tabstrip_dom::NodeId;

/// How long a new tab keeps its "just added" flag, in milliseconds
pub const JUST_ADDED_MS: f32 = 500.0;

/// A unit of deferred work
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTask {
    /// Write the position style block and place the add button
    WriteLayout { tab_width: f32, positions: Vec<f32> },
    /// Move a dropped tab from `left` into its transform
    SnapDropped { tab: NodeId, final_x: f32 },
    /// Leave sorting mode and make the dropped tab current
    ReleaseDropped { tab: NodeId },
    /// Hand the dropped tab back to the slot rules and rebind dragging
    SettleDropped { tab: NodeId },
    /// Clear the "just added" flag of a tab
    ClearJustAdded { tab: NodeId },
}

/// A task waiting for a deadline
#[derive(Debug, Clone)]
struct Timer {
    due_ms: f32,
    task: FrameTask,
}

/// Queue of deferred work
#[derive(Debug, Default)]
pub struct FrameQueue {
    /// Tasks for the next frame
    pending: Vec<FrameTask>,
    /// Tasks waiting for a deadline
    timers: Vec<Timer>,
    /// Frame clock in milliseconds
    now_ms: f32,
}

impl FrameQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on the next frame
    pub fn request(&mut self, task: FrameTask) {
        self.pending.push(task);
    }

    /// Run `task` on the first frame at least `delay_ms` from now
    pub fn set_timeout(&mut self, delay_ms: f32, task: FrameTask) {
        self.timers.push(Timer {
            due_ms: self.now_ms + delay_ms.max(0.0),
            task,
        });
    }

    /// Advance the clock and take everything due this frame: the tasks
    /// requested so far, then expired timers in deadline order
    pub fn begin_frame(&mut self, elapsed_ms: f32) -> Vec<FrameTask> {
        self.now_ms += elapsed_ms.max(0.0);

        let mut due = std::mem::take(&mut self.pending);

        let now = self.now_ms;
        let (mut expired, waiting): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due_ms <= now);
        self.timers = waiting;
        expired.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.extend(expired.into_iter().map(|t| t.task));

        due
    }

    /// Check if nothing is queued
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.timers.is_empty()
    }

    /// Number of tasks waiting for the next frame
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Frame clock in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.now_ms
    }
}
