//! Tab strip notifications
//!
//! Observers subscribe per event kind instead of listening for DOM custom
//! events on the container.

use tabstrip_dom::NodeId;

/// Notification emitted by a tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStripEvent {
    /// The add button was clicked
    NewTabRequested,
    /// A tab's close control was clicked
    CloseRequested { tab: NodeId },
    /// A tab element was inserted
    TabAdded { tab: NodeId },
    /// A tab element was detached
    TabRemoved { tab: NodeId },
    /// A tab became current
    ActiveTabChanged { tab: NodeId },
}

impl TabStripEvent {
    /// Kind used for subscription matching
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewTabRequested => EventKind::NewTabRequest,
            Self::CloseRequested { .. } => EventKind::CloseRequest,
            Self::TabAdded { .. } => EventKind::TabAdded,
            Self::TabRemoved { .. } => EventKind::TabRemoved,
            Self::ActiveTabChanged { .. } => EventKind::ActiveTabChanged,
        }
    }

    /// Tab the event is about, if any
    pub fn tab(&self) -> Option<NodeId> {
        match *self {
            Self::NewTabRequested => None,
            Self::CloseRequested { tab }
            | Self::TabAdded { tab }
            | Self::TabRemoved { tab }
            | Self::ActiveTabChanged { tab } => Some(tab),
        }
    }
}

/// Event kinds observers can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NewTabRequest,
    CloseRequest,
    TabAdded,
    TabRemoved,
    ActiveTabChanged,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Callback = Box<dyn FnMut(&TabStripEvent)>;

/// Registered observers
#[derive(Default)]
pub struct Listeners {
    next_id: u32,
    entries: Vec<(SubscriptionId, EventKind, Callback)>,
}

impl Listeners {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&TabStripEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind, Box::new(callback)));
        id
    }

    /// Drop a subscription; returns false if it was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver an event to every observer of its kind, in subscription order
    pub fn emit(&mut self, event: &TabStripEvent) {
        let kind = event.kind();
        log::trace!("emit {:?}", event);
        for (_, entry_kind, callback) in self.entries.iter_mut() {
            if *entry_kind == kind {
                callback(event);
            }
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no subscriptions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("subscriptions", &self.entries.len())
            .finish()
    }
}
