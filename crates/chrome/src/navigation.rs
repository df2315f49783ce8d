//! Per-tab back/forward history

/// Visited URLs of one tab and the position of the shown page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    history: Vec<String>,
    /// Index of the shown page, `None` while empty
    current: Option<usize>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding a single page
    pub fn starting_at(url: &str) -> Self {
        let mut nav = Self::new();
        nav.navigate_to(url);
        nav
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.history.get(i))
            .map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.history.len())
    }

    /// Visit `url`, dropping the pages we went back from
    pub fn navigate_to(&mut self, url: &str) {
        if let Some(i) = self.current {
            self.history.truncate(i + 1);
        }
        self.history.push(url.to_string());
        self.current = Some(self.history.len() - 1);
    }

    /// Step back; `None` at the first page
    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.current = self.current.map(|i| i - 1);
        self.current_url()
    }

    /// Step forward; `None` at the last page
    pub fn go_forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.current = self.current.map(|i| i + 1);
        self.current_url()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
