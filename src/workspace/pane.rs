//! Panes: a visible content region holding a tab list

use super::tab::{Tab, TabContent, TabId};

pub type PaneId = u64;

/// What a pane is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneKind {
    /// The bucket/key entry form
    #[default]
    Selector,
    /// A folder listing
    Browser,
    /// A single file
    Viewer,
}

/// Result of an open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The active tab's payload was swapped in place
    Replaced(TabId),
    /// A new tab was appended, possibly evicting the oldest unpinned one
    Appended { tab: TabId, evicted: Option<TabId> },
    /// Tab limit reached with every tab pinned; nothing changed
    Dropped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub id: PaneId,
    pub kind: PaneKind,
    pub bucket: String,
    pub prefix: String,
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<TabId>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Pane {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            kind: PaneKind::Selector,
            bucket: String::new(),
            prefix: String::new(),
            tabs: Vec::new(),
            active_tab_id: None,
            loading: false,
            error: None,
        }
    }

    /// New empty pane sharing this pane's bucket/prefix context
    pub fn split_from(&self, id: PaneId) -> Self {
        Self {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            ..Self::new(id)
        }
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let active = self.active_tab_id?;
        self.tabs.iter().find(|t| t.id() == active)
    }

    fn tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == tab_id)
    }

    /// Mark a request as in flight
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record a failed request as display text
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Place loaded content into the pane.
    ///
    /// With `new_tab` the content gets its own tab (subject to the tab limit);
    /// otherwise it replaces the active tab's payload, keeping its id.
    pub fn open(&mut self, content: TabContent, new_tab: bool, max_tabs: usize, next_id: TabId) -> OpenOutcome {
        self.loading = false;
        self.error = None;

        if !new_tab {
            if let Some(idx) = self.active_tab_id.and_then(|id| self.tab_index(id)) {
                let existing = &self.tabs[idx];
                let (id, pinned) = (existing.id(), existing.is_pinned());
                self.tabs[idx] = content.into_tab(id, pinned);
                self.sync_with_active();
                return OpenOutcome::Replaced(id);
            }
        }

        let mut evicted = None;
        if self.tabs.len() >= max_tabs.max(1) {
            match self.tabs.iter().position(|t| !t.is_pinned()) {
                Some(idx) => evicted = Some(self.tabs.remove(idx).id()),
                None => {
                    tracing::debug!("Pane {}: all {} tabs pinned, open dropped", self.id, self.tabs.len());
                    return OpenOutcome::Dropped;
                }
            }
        }

        self.tabs.push(content.into_tab(next_id, false));
        self.active_tab_id = Some(next_id);
        self.sync_with_active();
        OpenOutcome::Appended { tab: next_id, evicted }
    }

    /// Activate an existing tab
    pub fn switch_tab(&mut self, tab_id: TabId) -> bool {
        if self.tab_index(tab_id).is_none() {
            return false;
        }
        self.active_tab_id = Some(tab_id);
        self.error = None;
        self.sync_with_active();
        true
    }

    /// Close a tab; closing the active one activates its right neighbour, else its left
    pub fn close_tab(&mut self, tab_id: TabId) -> bool {
        let Some(idx) = self.tab_index(tab_id) else {
            return false;
        };
        self.tabs.remove(idx);

        if self.active_tab_id == Some(tab_id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[idx.min(self.tabs.len() - 1)].id())
            };
            self.sync_with_active();
        }
        true
    }

    pub fn close_all_tabs(&mut self) {
        self.tabs.clear();
        self.active_tab_id = None;
        self.sync_with_active();
    }

    /// Flip a tab's pinned flag, returning the new state
    pub fn toggle_pin(&mut self, tab_id: TabId) -> Option<bool> {
        let idx = self.tab_index(tab_id)?;
        let pinned = !self.tabs[idx].is_pinned();
        self.tabs[idx].set_pinned(pinned);
        Some(pinned)
    }

    /// Explicit "back to navigator": show the selector, keep the tabs
    pub fn back_to_selector(&mut self) {
        self.kind = PaneKind::Selector;
        self.bucket.clear();
        self.prefix.clear();
        self.loading = false;
        self.error = None;
    }

    fn sync_with_active(&mut self) {
        let view = self
            .active_tab()
            .map(|tab| (tab.bucket().to_string(), tab.prefix(), matches!(tab, Tab::File(_))));

        match view {
            Some((bucket, prefix, is_file)) => {
                self.kind = if is_file { PaneKind::Viewer } else { PaneKind::Browser };
                self.bucket = bucket;
                self.prefix = prefix;
            }
            None => {
                self.kind = PaneKind::Selector;
                self.bucket.clear();
                self.prefix.clear();
            }
        }
    }
}
