//! Folder table rows, inline filter and type-ahead jump

use chrono::{DateTime, Local, Utc};

use crate::classify::FileCategory;
use crate::s3::types::{ListResult, ObjectItem, SearchResult};

pub const EMPTY_FOLDER_MESSAGE: &str = "This folder is empty";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub key: String,
    pub name: String,
    pub category: FileCategory,
    pub type_label: &'static str,
    pub size: String,
    pub modified: String,
}

impl FolderRow {
    fn from_item(item: &ObjectItem, name: &str) -> Self {
        let folder = item.is_folder();
        Self {
            key: item.key.clone(),
            name: name.to_string(),
            category: item.category,
            type_label: item.category.label(),
            size: if folder { "-".to_string() } else { format_size(item.size_bytes) },
            modified: format_date(item.last_modified),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.category == FileCategory::Folder
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTable {
    pub rows: Vec<FolderRow>,
    /// Footer note, e.g. for truncated search results
    pub note: Option<String>,
}

impl FolderTable {
    /// Folders first, then files, each in listing order
    pub fn from_listing(listing: &ListResult) -> Self {
        let rows = listing
            .folders
            .iter()
            .chain(listing.files.iter())
            .map(|item| FolderRow::from_item(item, &item.name))
            .collect();
        Self { rows, note: None }
    }

    /// Search hits, named by full key since they span folders
    pub fn from_search(result: &SearchResult) -> Self {
        let rows: Vec<FolderRow> = result
            .results
            .iter()
            .map(|item| FolderRow::from_item(item, &item.key))
            .collect();
        let note = (result.total_found > rows.len())
            .then(|| format!("Showing {} of {} matches", rows.len(), result.total_found));
        Self { rows, note }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_FOLDER_MESSAGE)
    }

    /// Rows whose name contains `term`, ignoring case
    pub fn filter(&self, term: &str) -> Vec<&FolderRow> {
        let needle = term.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| needle.is_empty() || row.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Index of the first row whose name starts with the typed characters
    pub fn jump_to(&self, typed: &str) -> Option<usize> {
        if typed.is_empty() {
            return None;
        }
        let typed = typed.to_lowercase();
        self.rows.iter().position(|row| row.name.to_lowercase().starts_with(&typed))
    }

    pub fn find(&self, name: &str) -> Option<&FolderRow> {
        self.rows
            .iter()
            .find(|row| row.name == name || row.name.trim_end_matches('/') == name.trim_end_matches('/'))
    }
}

/// Human-readable size: up to two decimals, trailing zeros dropped
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

/// Local date and time, or "-" when the store gave none
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn file(key: &str, size: u64) -> ObjectItem {
        ObjectItem {
            category: crate::classify::classify(key, None),
            key: key.to_string(),
            name: crate::s3::types::display_name(key).to_string(),
            size_bytes: size,
            last_modified: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    fn root_listing() -> ListResult {
        ListResult {
            folders: vec![ObjectItem::folder("a/"), ObjectItem::folder("b/")],
            files: vec![file("readme.md", 1536)],
            prefix: String::new(),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_234_567), "1.18 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "-");
        let shown = format_date(Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert_eq!(shown.len(), 19);
    }

    #[test]
    fn test_rows_from_listing() {
        let table = FolderTable::from_listing(&root_listing());
        assert_eq!(table.rows.len(), 3);

        let folders: Vec<&FolderRow> = table.rows.iter().filter(|r| r.is_folder()).collect();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].size, "-");
        assert_eq!(folders[0].modified, "-");

        let readme = table.find("readme.md").unwrap();
        assert_eq!(readme.category, FileCategory::Markdown);
        assert_eq!(readme.type_label, "Markdown");
        assert_eq!(readme.size, "1.5 KB");
    }

    #[test]
    fn test_filter_and_jump() {
        let table = FolderTable::from_listing(&root_listing());
        assert_eq!(table.filter("READ").len(), 1);
        assert_eq!(table.filter("").len(), 3);
        assert!(table.filter("zzz").is_empty());

        assert_eq!(table.jump_to("b"), Some(1));
        assert_eq!(table.jump_to("Re"), Some(2));
        assert_eq!(table.jump_to("x"), None);
        assert_eq!(table.jump_to(""), None);
    }

    #[test]
    fn test_empty_state() {
        let table = FolderTable::from_listing(&ListResult::default());
        assert_eq!(table.empty_message(), Some("This folder is empty"));
        assert_eq!(FolderTable::from_listing(&root_listing()).empty_message(), None);
    }

    #[test]
    fn test_search_rows_use_full_key() {
        let result = SearchResult {
            results: vec![file("logs/2024/app.log", 10)],
            total_found: 250,
        };
        let table = FolderTable::from_search(&result);
        assert_eq!(table.rows[0].name, "logs/2024/app.log");
        assert_eq!(table.note.as_deref(), Some("Showing 1 of 250 matches"));
    }
}
