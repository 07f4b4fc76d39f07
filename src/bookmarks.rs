//! Bookmarked bucket and folder locations
//!
//! Bookmarks are unique by `(bucket, prefix)`; an empty prefix marks the
//! bucket root. The newest bookmark comes first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedItem {
    pub bucket: String,
    /// Empty for the bucket root, otherwise a folder prefix ending in "/"
    pub prefix: String,
    pub added_at: DateTime<Utc>,
}

impl BookmarkedItem {
    pub fn matches(&self, bucket: &str, prefix: &str) -> bool {
        self.bucket == bucket && self.prefix == prefix
    }

    /// Sidebar label: the folder name, or the bucket for root bookmarks
    pub fn label(&self) -> &str {
        if self.prefix.is_empty() {
            &self.bucket
        } else {
            crate::s3::types::display_name(&self.prefix)
        }
    }
}

/// Stored shapes, including the bucket-only format from older releases
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBookmark {
    Current(BookmarkedItem),
    #[serde(rename_all = "camelCase")]
    Legacy { name: String, added_at: DateTime<Utc> },
}

impl From<StoredBookmark> for BookmarkedItem {
    fn from(stored: StoredBookmark) -> Self {
        match stored {
            StoredBookmark::Current(item) => item,
            StoredBookmark::Legacy { name, added_at } => BookmarkedItem {
                bucket: name,
                prefix: String::new(),
                added_at,
            },
        }
    }
}

/// Ordered, duplicate-free bookmark list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<StoredBookmark>", into = "Vec<BookmarkedItem>")]
pub struct Bookmarks {
    items: Vec<BookmarkedItem>,
}

impl From<Vec<StoredBookmark>> for Bookmarks {
    fn from(stored: Vec<StoredBookmark>) -> Self {
        let mut bookmarks = Bookmarks::default();
        for item in stored.into_iter().map(BookmarkedItem::from) {
            if !bookmarks.contains(&item.bucket, &item.prefix) {
                bookmarks.items.push(item);
            }
        }
        bookmarks
    }
}

impl From<Bookmarks> for Vec<BookmarkedItem> {
    fn from(bookmarks: Bookmarks) -> Self {
        bookmarks.items
    }
}

impl Bookmarks {
    pub fn items(&self) -> &[BookmarkedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, bucket: &str, prefix: &str) -> bool {
        self.items.iter().any(|item| item.matches(bucket, prefix))
    }

    /// Add a bookmark at the front. Blank buckets and duplicates are ignored.
    pub fn add(&mut self, bucket: &str, prefix: &str) -> bool {
        if bucket.trim().is_empty() || self.contains(bucket, prefix) {
            return false;
        }
        self.items.insert(
            0,
            BookmarkedItem {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                added_at: Utc::now(),
            },
        );
        true
    }

    pub fn remove(&mut self, bucket: &str, prefix: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(bucket, prefix));
        self.items.len() != before
    }

    /// Add or remove, returning whether the location is now bookmarked
    pub fn toggle(&mut self, bucket: &str, prefix: &str) -> bool {
        if self.contains(bucket, prefix) {
            self.remove(bucket, prefix);
            false
        } else {
            self.add(bucket, prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_prepends() {
        let mut bookmarks = Bookmarks::default();
        assert!(bookmarks.add("alpha", ""));
        assert!(bookmarks.add("beta", "logs/"));

        let order: Vec<&str> = bookmarks.items().iter().map(|b| b.bucket.as_str()).collect();
        assert_eq!(order, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut bookmarks = Bookmarks::default();
        bookmarks.add("alpha", "a/");
        assert!(!bookmarks.add("alpha", "a/"));
        assert_eq!(bookmarks.len(), 1);

        // Same bucket, different prefix is a separate bookmark
        assert!(bookmarks.add("alpha", ""));
        assert_eq!(bookmarks.len(), 2);
    }

    #[test]
    fn test_add_blank_bucket_is_ignored() {
        let mut bookmarks = Bookmarks::default();
        assert!(!bookmarks.add("  ", ""));
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut bookmarks = Bookmarks::default();
        bookmarks.add("alpha", "");
        assert!(!bookmarks.remove("alpha", "x/"));
        assert!(bookmarks.remove("alpha", ""));
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut bookmarks = Bookmarks::default();
        assert!(bookmarks.toggle("alpha", "docs/"));
        assert!(bookmarks.contains("alpha", "docs/"));
        assert!(!bookmarks.toggle("alpha", "docs/"));
        assert!(!bookmarks.contains("alpha", "docs/"));
    }

    #[test]
    fn test_label() {
        let mut bookmarks = Bookmarks::default();
        bookmarks.add("alpha", "");
        bookmarks.add("alpha", "reports/2024/");
        assert_eq!(bookmarks.items()[0].label(), "2024");
        assert_eq!(bookmarks.items()[1].label(), "alpha");
    }

    #[test]
    fn test_legacy_shape_migrates() {
        let json = r#"[
            {"name": "old-bucket", "addedAt": "2023-05-01T10:00:00Z"},
            {"bucket": "new-bucket", "prefix": "data/", "addedAt": "2024-01-02T03:04:05Z"}
        ]"#;
        let bookmarks: Bookmarks = serde_json::from_str(json).unwrap();

        assert_eq!(bookmarks.len(), 2);
        assert!(bookmarks.contains("old-bucket", ""));
        assert!(bookmarks.contains("new-bucket", "data/"));
    }

    #[test]
    fn test_serializes_current_shape() {
        let mut bookmarks = Bookmarks::default();
        bookmarks.add("alpha", "a/");
        let value = serde_json::to_value(&bookmarks).unwrap();

        assert_eq!(value[0]["bucket"], "alpha");
        assert_eq!(value[0]["prefix"], "a/");
        assert!(value[0]["addedAt"].is_string());
    }

    #[test]
    fn test_stored_duplicates_collapse() {
        let json = r#"[
            {"bucket": "b", "prefix": "", "addedAt": "2024-01-02T03:04:05Z"},
            {"name": "b", "addedAt": "2023-01-02T03:04:05Z"}
        ]"#;
        let bookmarks: Bookmarks = serde_json::from_str(json).unwrap();
        assert_eq!(bookmarks.len(), 1);
    }
}
