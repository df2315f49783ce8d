//! Callbacks into the hosting environment
//!
//! Every hook is optional. Firing a hook that was never installed does
//! nothing.

type Hook = Box<dyn FnMut()>;

/// Host callbacks the chrome invokes
#[derive(Default)]
pub struct HostHooks {
    on_address_bar_focus: Option<Hook>,
    on_address_bar_blur: Option<Hook>,
    close_suggestions: Option<Hook>,
    update_downloads_badge: Option<Hook>,
}

impl HostHooks {
    /// No hooks installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the address bar gains focus
    pub fn with_address_bar_focus(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_address_bar_focus = Some(Box::new(hook));
        self
    }

    /// Called when the address bar loses focus
    pub fn with_address_bar_blur(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_address_bar_blur = Some(Box::new(hook));
        self
    }

    /// Closes the suggestions overlay
    pub fn with_close_suggestions(mut self, hook: impl FnMut() + 'static) -> Self {
        self.close_suggestions = Some(Box::new(hook));
        self
    }

    /// Refreshes the downloads badge
    pub fn with_downloads_badge(mut self, hook: impl FnMut() + 'static) -> Self {
        self.update_downloads_badge = Some(Box::new(hook));
        self
    }

    pub(crate) fn address_bar_focused(&mut self) {
        fire(&mut self.on_address_bar_focus);
    }

    pub(crate) fn address_bar_blurred(&mut self) {
        fire(&mut self.on_address_bar_blur);
    }

    /// Returns false when no closer is installed
    pub(crate) fn close_suggestions(&mut self) -> bool {
        fire(&mut self.close_suggestions)
    }

    /// Returns false when no updater is installed
    pub(crate) fn update_downloads_badge(&mut self) -> bool {
        fire(&mut self.update_downloads_badge)
    }
}

fn fire(hook: &mut Option<Hook>) -> bool {
    match hook {
        Some(hook) => {
            hook();
            true
        }
        None => false,
    }
}

impl std::fmt::Debug for HostHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHooks")
            .field("on_address_bar_focus", &self.on_address_bar_focus.is_some())
            .field("on_address_bar_blur", &self.on_address_bar_blur.is_some())
            .field("close_suggestions", &self.close_suggestions.is_some())
            .field("update_downloads_badge", &self.update_downloads_badge.is_some())
            .finish()
    }
}
