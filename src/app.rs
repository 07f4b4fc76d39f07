//! Application state and command dispatch
//!
//! The front end turns user intents into [`Command`]s; [`App`] issues the
//! matching gateway calls and applies their results to the workspace. Every
//! failure ends up as the pane's error text, never as a returned error.

use std::path::PathBuf;

use crate::bookmarks::Bookmarks;
use crate::gateway::{GatewayError, ObjectStore};
use crate::navigation::{Breadcrumb, FolderTable, Sidebar};
use crate::s3::types::{ListResult, ObjectResult, S3Url, SearchResult};
use crate::settings::Settings;
use crate::viewers::ViewerContent;
use crate::workspace::{PaneId, Tab, TabContent, TabId, Workspace};

/// Bucket/key pair a secondary window starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub bucket: String,
    pub key: String,
}

impl LaunchParams {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Arguments that reopen this location with the binary
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--bucket".to_string(),
            self.bucket.clone(),
            "--key".to_string(),
            self.key.clone(),
        ]
    }

    pub fn to_s3_url(&self) -> String {
        S3Url::new(&self.bucket, &self.key).to_s3_url()
    }
}

impl From<S3Url> for LaunchParams {
    fn from(url: S3Url) -> Self {
        Self {
            bucket: url.bucket,
            key: url.key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Selector form: empty key or trailing "/" browses, anything else opens a file
    SelectLocation { bucket: String, key: String },
    /// Browse a prefix of the active pane's bucket, replacing the active tab
    Navigate { prefix: String },
    OpenFile { key: String, new_tab: bool },
    /// Reload the folder that holds the file being viewed
    BackToFolder,
    BackToSelector,
    Search { term: String },
    SwitchTab(TabId),
    CloseTab(TabId),
    CloseAllTabs,
    TogglePin(TabId),
    SplitPane,
    ClosePane(PaneId),
    SetActivePane(PaneId),
    /// Open two or three files side by side
    OpenInSplit(Vec<String>),
    OpenInNewWindow,
    ToggleBookmark { bucket: String, prefix: String },
    OpenBookmark { bucket: String, prefix: String },
    SetSidebarWidth(u32),
    SetMaxTabs(usize),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectLocation { .. } => "select-location",
            Command::Navigate { .. } => "navigate",
            Command::OpenFile { .. } => "open-file",
            Command::BackToFolder => "back-to-folder",
            Command::BackToSelector => "back-to-selector",
            Command::Search { .. } => "search",
            Command::SwitchTab(_) => "switch-tab",
            Command::CloseTab(_) => "close-tab",
            Command::CloseAllTabs => "close-all-tabs",
            Command::TogglePin(_) => "toggle-pin",
            Command::SplitPane => "split-pane",
            Command::ClosePane(_) => "close-pane",
            Command::SetActivePane(_) => "set-active-pane",
            Command::OpenInSplit(_) => "open-in-split",
            Command::OpenInNewWindow => "open-in-new-window",
            Command::ToggleBookmark { .. } => "toggle-bookmark",
            Command::OpenBookmark { .. } => "open-bookmark",
            Command::SetSidebarWidth(_) => "set-sidebar-width",
            Command::SetMaxTabs(_) => "set-max-tabs",
        }
    }
}

/// What a command produced beyond the workspace change
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Search(SearchResult),
    NewWindow(LaunchParams),
    /// The command did not apply in the current state
    Ignored(String),
}

/// Owns the workspace, bookmarks and settings; talks to the store
pub struct App<S> {
    store: S,
    workspace: Workspace,
    settings: Settings,
    settings_path: Option<PathBuf>,
    last_search: Option<SearchResult>,
}

impl<S: ObjectStore> App<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            workspace: Workspace::new(settings.max_tabs_per_pane),
            store,
            settings,
            settings_path: None,
            last_search: None,
        }
    }

    /// Persist preference changes to `path`
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.settings.bookmarks
    }

    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    pub async fn dispatch(&mut self, command: Command) -> Outcome {
        tracing::debug!("Command: {}", command.name());
        let active = self.workspace.active_pane_id;

        match command {
            Command::SelectLocation { bucket, key } => {
                self.select_location(active, bucket.trim(), key.trim()).await;
            }
            Command::Navigate { prefix } => {
                let Some(bucket) = self.pane_bucket(active) else {
                    return Outcome::Ignored("No bucket selected".to_string());
                };
                tracing::info!("Navigating to {}/{}", bucket, prefix);
                self.load_folder(active, &bucket, &prefix, false).await;
            }
            Command::OpenFile { key, new_tab } => {
                let Some(bucket) = self.pane_bucket(active) else {
                    return Outcome::Ignored("No bucket selected".to_string());
                };
                tracing::info!("Opening {}/{} (new tab: {})", bucket, key, new_tab);
                self.load_file(active, &bucket, &key, new_tab).await;
            }
            Command::BackToFolder => {
                let pane = self.workspace.active_pane();
                let (bucket, prefix) = (pane.bucket.clone(), pane.prefix.clone());
                if bucket.is_empty() {
                    return Outcome::Ignored("No bucket selected".to_string());
                }
                self.load_folder(active, &bucket, &prefix, false).await;
            }
            Command::BackToSelector => {
                self.workspace.back_to_selector(active);
            }
            Command::Search { term } => return self.search(active, &term).await,
            Command::SwitchTab(tab) => {
                if !self.workspace.switch_tab(active, tab) {
                    return Outcome::Ignored(format!("No tab {}", tab));
                }
            }
            Command::CloseTab(tab) => {
                if !self.workspace.close_tab(active, tab) {
                    return Outcome::Ignored(format!("No tab {}", tab));
                }
            }
            Command::CloseAllTabs => {
                self.workspace.close_all_tabs(active);
            }
            Command::TogglePin(tab) => {
                if self.workspace.toggle_pin(active, tab).is_none() {
                    return Outcome::Ignored(format!("No tab {}", tab));
                }
            }
            Command::SplitPane => return self.split_pane(active).await,
            Command::ClosePane(pane) => {
                if self.workspace.pane(pane).is_none() {
                    return Outcome::Ignored(format!("No pane {}", pane));
                }
                if !self.workspace.close_pane(pane) {
                    return Outcome::Ignored("The last pane cannot be closed".to_string());
                }
            }
            Command::SetActivePane(pane) => {
                if !self.workspace.set_active_pane(pane) {
                    return Outcome::Ignored(format!("No pane {}", pane));
                }
            }
            Command::OpenInSplit(keys) => return self.open_in_split(&keys).await,
            Command::OpenInNewWindow => {
                return match self.launch_params() {
                    Some(params) => Outcome::NewWindow(params),
                    None => Outcome::Ignored("No file open in the active pane".to_string()),
                };
            }
            Command::ToggleBookmark { bucket, prefix } => {
                let added = self.settings.bookmarks.toggle(&bucket, &prefix);
                tracing::info!(
                    "Bookmark {}/{} {}",
                    bucket,
                    prefix,
                    if added { "added" } else { "removed" }
                );
                self.persist();
            }
            Command::OpenBookmark { bucket, prefix } => {
                self.select_location(active, &bucket, &prefix).await;
            }
            Command::SetSidebarWidth(width) => {
                self.settings.set_sidebar_width(width);
                self.persist();
            }
            Command::SetMaxTabs(max_tabs) => {
                self.settings.set_max_tabs(max_tabs);
                self.workspace.set_max_tabs(self.settings.max_tabs_per_pane);
                self.persist();
            }
        }
        Outcome::Done
    }

    /// Open a deep-linked location in the first pane
    pub async fn launch(&mut self, params: &LaunchParams) {
        let first = self.workspace.panes[0].id;
        self.workspace.set_active_pane(first);
        tracing::info!("Opening launch location {}", params.to_s3_url());
        self.select_location(first, &params.bucket, &params.key).await;
    }

    async fn select_location(&mut self, pane_id: PaneId, bucket: &str, key: &str) {
        if bucket.is_empty() {
            if let Some(pane) = self.workspace.pane_mut(pane_id) {
                pane.fail("Enter a bucket name");
            }
            return;
        }
        if key.is_empty() || key.ends_with('/') {
            self.load_folder(pane_id, bucket, key, true).await;
        } else {
            self.load_file(pane_id, bucket, key, true).await;
        }
    }

    pub async fn load_folder(&mut self, pane_id: PaneId, bucket: &str, prefix: &str, new_tab: bool) {
        self.begin_request(pane_id);
        let result = self.store.list_objects(bucket, prefix).await;
        self.apply_folder(pane_id, bucket, result, new_tab);
    }

    /// Fetch a file; a missing key is retried as a folder prefix
    pub async fn load_file(&mut self, pane_id: PaneId, bucket: &str, key: &str, new_tab: bool) {
        self.begin_request(pane_id);
        match self.store.get_object(bucket, key).await {
            Err(err) if err.is_not_found() => {
                let prefix = if key.ends_with('/') {
                    key.to_string()
                } else {
                    format!("{}/", key)
                };
                tracing::info!("{} not found as a file, listing {} instead", key, prefix);
                self.load_folder(pane_id, bucket, &prefix, new_tab).await;
            }
            result => self.apply_file(pane_id, bucket, result, new_tab),
        }
    }

    fn begin_request(&mut self, pane_id: PaneId) {
        if let Some(pane) = self.workspace.pane_mut(pane_id) {
            pane.begin_request();
        }
    }

    /// Apply a listing response; whichever response is applied last wins
    pub fn apply_folder(&mut self, pane_id: PaneId, bucket: &str, result: Result<ListResult, GatewayError>, new_tab: bool) {
        let content = result.map(|data| TabContent::Folder {
            bucket: bucket.to_string(),
            data,
        });
        self.apply(pane_id, content, new_tab);
    }

    pub fn apply_file(&mut self, pane_id: PaneId, bucket: &str, result: Result<ObjectResult, GatewayError>, new_tab: bool) {
        let content = result.map(|data| TabContent::File {
            bucket: bucket.to_string(),
            data,
        });
        self.apply(pane_id, content, new_tab);
    }

    fn apply(&mut self, pane_id: PaneId, content: Result<TabContent, GatewayError>, new_tab: bool) {
        match content {
            Ok(content) => {
                self.workspace.open(pane_id, content, new_tab);
            }
            Err(err) => {
                tracing::error!("Pane {}: request failed: {}", pane_id, err);
                if let Some(pane) = self.workspace.pane_mut(pane_id) {
                    pane.fail(err.to_string());
                }
            }
        }
    }

    async fn search(&mut self, pane_id: PaneId, term: &str) -> Outcome {
        let Some(bucket) = self.pane_bucket(pane_id) else {
            return Outcome::Ignored("No bucket selected".to_string());
        };
        let prefix = self.workspace.active_pane().prefix.clone();
        tracing::info!("Searching {}/{} for '{}'", bucket, prefix, term);

        self.begin_request(pane_id);
        let result = self.store.search_objects(&bucket, term, &prefix).await;
        let pane = self.workspace.pane_mut(pane_id);
        match result {
            Ok(found) => {
                if let Some(pane) = pane {
                    pane.loading = false;
                }
                self.last_search = Some(found.clone());
                Outcome::Search(found)
            }
            Err(err) => {
                tracing::error!("Search failed: {}", err);
                let message = err.to_string();
                if let Some(pane) = pane {
                    pane.fail(message.clone());
                }
                Outcome::Ignored(message)
            }
        }
    }

    async fn split_pane(&mut self, source: PaneId) -> Outcome {
        let Some(new_pane) = self.workspace.split_pane(source) else {
            return Outcome::Ignored("At most 3 panes are supported".to_string());
        };
        let (bucket, prefix) = match self.workspace.pane(new_pane) {
            Some(pane) => (pane.bucket.clone(), pane.prefix.clone()),
            None => return Outcome::Done,
        };
        // The copy starts with no tabs; its first tab is a fresh listing of the same folder
        if !bucket.is_empty() {
            self.load_folder(new_pane, &bucket, &prefix, true).await;
        }
        Outcome::Done
    }

    async fn open_in_split(&mut self, keys: &[String]) -> Outcome {
        if !(2..=crate::workspace::MAX_PANES).contains(&keys.len()) {
            return Outcome::Ignored(format!("Select 2 or 3 files to split, got {}", keys.len()));
        }
        let Some(bucket) = self.pane_bucket(self.workspace.active_pane_id) else {
            return Outcome::Ignored("No bucket selected".to_string());
        };

        let panes = self.workspace.resize_to(keys.len());
        tracing::info!("Opening {} files side by side", keys.len());
        for (pane_id, key) in panes.iter().zip(keys) {
            self.load_file(*pane_id, &bucket, key, true).await;
        }
        if let Some(first) = panes.first() {
            self.workspace.set_active_pane(*first);
        }
        Outcome::Done
    }

    fn pane_bucket(&self, pane_id: PaneId) -> Option<String> {
        self.workspace
            .pane(pane_id)
            .map(|p| p.bucket.clone())
            .filter(|b| !b.is_empty())
    }

    /// Deep link for the file in the active pane
    pub fn launch_params(&self) -> Option<LaunchParams> {
        match self.workspace.active_pane().active_tab()? {
            Tab::File(tab) => Some(LaunchParams::new(&tab.bucket, &tab.key)),
            Tab::Folder(_) => None,
        }
    }

    fn persist(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            tracing::warn!("Failed to save settings: {:#}", e);
        }
    }

    pub fn breadcrumb(&self) -> Option<Breadcrumb> {
        let pane = self.workspace.active_pane();
        if pane.bucket.is_empty() {
            return None;
        }
        let bookmarked = self.settings.bookmarks.contains(&pane.bucket, "");
        Some(Breadcrumb::new(&pane.bucket, &pane.prefix, bookmarked))
    }

    pub fn folder_table(&self) -> Option<FolderTable> {
        match self.workspace.active_pane().active_tab()? {
            Tab::Folder(tab) => Some(FolderTable::from_listing(&tab.folder_data)),
            Tab::File(_) => None,
        }
    }

    pub fn viewer(&self) -> Option<ViewerContent> {
        match self.workspace.active_pane().active_tab()? {
            Tab::File(tab) => Some(ViewerContent::for_object(&tab.file_data)),
            Tab::Folder(_) => None,
        }
    }

    pub fn sidebar(&self) -> Sidebar {
        let pane = self.workspace.active_pane();
        Sidebar::new(&self.settings.bookmarks, self.settings.sidebar_width, &pane.bucket, &pane.prefix)
    }
}
