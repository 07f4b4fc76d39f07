//! Tabs: one open file or folder view inside a pane

use crate::s3::types::{display_name, parent_prefix, ListResult, ObjectResult};

pub type TabId = u64;

/// An open file
#[derive(Debug, Clone, PartialEq)]
pub struct FileTab {
    pub id: TabId,
    pub bucket: String,
    pub key: String,
    pub file_name: String,
    pub file_data: ObjectResult,
    pub pinned: bool,
}

/// An open folder listing
#[derive(Debug, Clone, PartialEq)]
pub struct FolderTab {
    pub id: TabId,
    pub bucket: String,
    pub prefix: String,
    pub folder_name: String,
    pub folder_data: ListResult,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tab {
    File(FileTab),
    Folder(FolderTab),
}

/// Loaded content waiting to be placed into a tab
#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    File { bucket: String, data: ObjectResult },
    Folder { bucket: String, data: ListResult },
}

impl TabContent {
    pub fn bucket(&self) -> &str {
        match self {
            TabContent::File { bucket, .. } | TabContent::Folder { bucket, .. } => bucket,
        }
    }

    /// Build a tab around this content
    pub fn into_tab(self, id: TabId, pinned: bool) -> Tab {
        match self {
            TabContent::File { bucket, data } => Tab::File(FileTab {
                id,
                file_name: data.file_name().to_string(),
                key: data.key.clone(),
                bucket,
                file_data: data,
                pinned,
            }),
            TabContent::Folder { bucket, data } => {
                let folder_name = if data.prefix.is_empty() {
                    bucket.clone()
                } else {
                    display_name(&data.prefix).to_string()
                };
                Tab::Folder(FolderTab {
                    id,
                    prefix: data.prefix.clone(),
                    bucket,
                    folder_name,
                    folder_data: data,
                    pinned,
                })
            }
        }
    }
}

impl Tab {
    pub fn id(&self) -> TabId {
        match self {
            Tab::File(tab) => tab.id,
            Tab::Folder(tab) => tab.id,
        }
    }

    pub fn is_pinned(&self) -> bool {
        match self {
            Tab::File(tab) => tab.pinned,
            Tab::Folder(tab) => tab.pinned,
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        match self {
            Tab::File(tab) => tab.pinned = pinned,
            Tab::Folder(tab) => tab.pinned = pinned,
        }
    }

    pub fn bucket(&self) -> &str {
        match self {
            Tab::File(tab) => &tab.bucket,
            Tab::Folder(tab) => &tab.bucket,
        }
    }

    /// Folder prefix the pane shows while this tab is active
    pub fn prefix(&self) -> String {
        match self {
            Tab::File(tab) => parent_prefix(&tab.key),
            Tab::Folder(tab) => tab.prefix.clone(),
        }
    }

    /// Tab strip title
    pub fn title(&self) -> &str {
        match self {
            Tab::File(tab) => &tab.file_name,
            Tab::Folder(tab) if tab.folder_name.is_empty() => "Folder",
            Tab::Folder(tab) => &tab.folder_name,
        }
    }

    /// Hover text naming the full location
    pub fn tooltip(&self) -> String {
        match self {
            Tab::File(tab) => format!("File: {}/{}", tab.bucket, tab.key),
            Tab::Folder(tab) => format!("Folder: {}/{}", tab.bucket, tab.prefix),
        }
    }
}
