//! Workspace state: layout, panes and their tabs
//!
//! Every mutation goes through [`Workspace`], which owns the id counter so
//! pane and tab ids stay unique for the lifetime of the window.

pub mod pane;
pub mod tab;

pub use pane::{OpenOutcome, Pane, PaneId, PaneKind};
pub use tab::{FileTab, FolderTab, Tab, TabContent, TabId};

/// Most panes shown side by side
pub const MAX_PANES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Single,
    Split2,
    Split3,
}

impl Layout {
    fn for_pane_count(count: usize) -> Self {
        match count {
            0 | 1 => Layout::Single,
            2 => Layout::Split2,
            _ => Layout::Split3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub layout: Layout,
    pub panes: Vec<Pane>,
    pub active_pane_id: PaneId,
    max_tabs: usize,
    next_id: u64,
}

impl Workspace {
    /// One empty selector pane
    pub fn new(max_tabs: usize) -> Self {
        Self {
            layout: Layout::Single,
            panes: vec![Pane::new(1)],
            active_pane_id: 1,
            max_tabs: max_tabs.max(1),
            next_id: 2,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    /// Applies to later opens; existing tabs are left alone
    pub fn set_max_tabs(&mut self, max_tabs: usize) {
        self.max_tabs = max_tabs.max(1);
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == id)
    }

    pub fn active_pane(&self) -> &Pane {
        self.pane(self.active_pane_id).unwrap_or(&self.panes[0])
    }

    pub fn active_pane_mut(&mut self) -> &mut Pane {
        let idx = self
            .panes
            .iter()
            .position(|p| p.id == self.active_pane_id)
            .unwrap_or(0);
        &mut self.panes[idx]
    }

    pub fn set_active_pane(&mut self, id: PaneId) -> bool {
        if self.pane(id).is_none() {
            return false;
        }
        self.active_pane_id = id;
        true
    }

    /// Place content into a pane, see [`Pane::open`]
    pub fn open(&mut self, pane_id: PaneId, content: TabContent, new_tab: bool) -> Option<OpenOutcome> {
        let tab_id = self.allocate_id();
        let max_tabs = self.max_tabs;
        let pane = self.pane_mut(pane_id)?;
        let outcome = pane.open(content, new_tab, max_tabs, tab_id);
        tracing::debug!("Pane {}: open -> {:?}", pane_id, outcome);
        Some(outcome)
    }

    pub fn switch_tab(&mut self, pane_id: PaneId, tab_id: TabId) -> bool {
        self.pane_mut(pane_id).is_some_and(|p| p.switch_tab(tab_id))
    }

    pub fn close_tab(&mut self, pane_id: PaneId, tab_id: TabId) -> bool {
        self.pane_mut(pane_id).is_some_and(|p| p.close_tab(tab_id))
    }

    pub fn close_all_tabs(&mut self, pane_id: PaneId) -> bool {
        match self.pane_mut(pane_id) {
            Some(pane) => {
                pane.close_all_tabs();
                true
            }
            None => false,
        }
    }

    pub fn toggle_pin(&mut self, pane_id: PaneId, tab_id: TabId) -> Option<bool> {
        self.pane_mut(pane_id)?.toggle_pin(tab_id)
    }

    pub fn back_to_selector(&mut self, pane_id: PaneId) -> bool {
        match self.pane_mut(pane_id) {
            Some(pane) => {
                pane.back_to_selector();
                true
            }
            None => false,
        }
    }

    /// Add a pane after the others, inheriting `source`'s bucket and prefix.
    ///
    /// The new pane becomes active. Returns `None` at [`MAX_PANES`].
    pub fn split_pane(&mut self, source: PaneId) -> Option<PaneId> {
        if self.panes.len() >= MAX_PANES {
            return None;
        }
        let id = self.allocate_id();
        let pane = self.pane(source)?.split_from(id);
        self.panes.push(pane);
        self.active_pane_id = id;
        self.layout = Layout::for_pane_count(self.panes.len());
        tracing::debug!("Split pane {} into {} ({:?})", source, id, self.layout);
        Some(id)
    }

    /// Remove a pane. The last remaining pane cannot be closed.
    pub fn close_pane(&mut self, id: PaneId) -> bool {
        if self.panes.len() <= 1 {
            return false;
        }
        let Some(idx) = self.panes.iter().position(|p| p.id == id) else {
            return false;
        };
        self.panes.remove(idx);

        if self.active_pane_id == id {
            if let Some(last) = self.panes.last() {
                self.active_pane_id = last.id;
            }
        }
        self.layout = Layout::for_pane_count(self.panes.len());
        true
    }

    /// Grow or shrink to exactly `count` panes (clamped to 1..=MAX_PANES).
    ///
    /// New panes copy the active pane's context; trailing panes are dropped.
    pub fn resize_to(&mut self, count: usize) -> Vec<PaneId> {
        let count = count.clamp(1, MAX_PANES);
        let active = self.active_pane_id;
        while self.panes.len() < count {
            if self.split_pane(active).is_none() {
                break;
            }
        }
        while self.panes.len() > count {
            if let Some(last) = self.panes.last().map(|p| p.id) {
                self.close_pane(last);
            }
        }
        if self.pane(active).is_some() {
            self.active_pane_id = active;
        }
        self.panes.iter().map(|p| p.id).collect()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_MAX_TABS)
    }
}
