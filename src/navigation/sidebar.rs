//! Bookmarks sidebar

use crate::bookmarks::Bookmarks;
use crate::settings::{MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH};

pub const EMPTY_SIDEBAR_MESSAGE: &str = "No bookmarks yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub bucket: String,
    pub prefix: String,
    pub label: String,
    pub tooltip: String,
    /// The active pane shows this location
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub width: u32,
    pub entries: Vec<SidebarEntry>,
}

impl Sidebar {
    pub fn new(bookmarks: &Bookmarks, width: u32, current_bucket: &str, current_prefix: &str) -> Self {
        let entries = bookmarks
            .items()
            .iter()
            .map(|item| SidebarEntry {
                bucket: item.bucket.clone(),
                prefix: item.prefix.clone(),
                label: item.label().to_string(),
                tooltip: format!("Open {}/{}", item.bucket, item.prefix),
                active: item.matches(current_bucket, current_prefix),
            })
            .collect();

        Self {
            width: clamp_width(width),
            entries,
        }
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.entries.is_empty().then_some(EMPTY_SIDEBAR_MESSAGE)
    }

    /// Drag-resize, kept within the allowed range
    pub fn resize(&mut self, width: i64) {
        self.width = width.clamp(MIN_SIDEBAR_WIDTH as i64, MAX_SIDEBAR_WIDTH as i64) as u32;
    }
}

pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
}
