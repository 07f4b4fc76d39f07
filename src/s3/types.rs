//! Object storage data types shared by the gateway, workspace and viewers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::FileCategory;

/// One row of a listing or search result (file or synthesized folder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectItem {
    pub category: FileCategory,
    pub key: String,
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectItem {
    /// Folder entry synthesized from a common prefix
    pub fn folder(prefix: &str) -> Self {
        Self {
            category: FileCategory::Folder,
            key: prefix.to_string(),
            name: display_name(prefix).to_string(),
            size_bytes: 0,
            last_modified: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.category == FileCategory::Folder
    }
}

/// Last component of a key, ignoring a trailing `/`
pub fn display_name(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or(key)
}

/// Prefix of the folder that contains `key` (empty at the bucket root)
pub fn parent_prefix(key: &str) -> String {
    match key.trim_end_matches('/').rfind('/') {
        Some(idx) => key[..=idx].to_string(),
        None => String::new(),
    }
}

/// Body of a fetched object, shaped by its category
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPayload {
    /// Parsed JSON document
    Json(serde_json::Value),
    /// Decoded text (markdown, html, other, and JSON that failed to parse)
    Text(String),
    /// Base64-encoded bytes of an image
    Image(String),
}

/// A classified, fetched object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectResult {
    pub category: FileCategory,
    pub payload: ObjectPayload,
    pub key: String,
    pub content_type: Option<String>,
    /// Set when the object looked like JSON but did not parse
    pub parse_error: Option<String>,
}

impl ObjectResult {
    pub fn file_name(&self) -> &str {
        display_name(&self.key)
    }
}

/// One non-recursive listing level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub folders: Vec<ObjectItem>,
    pub files: Vec<ObjectItem>,
    pub prefix: String,
}

impl ListResult {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Bounded bucket search outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub results: Vec<ObjectItem>,
    /// Matches seen before the scan stopped; not an exact bucket-wide count
    pub total_found: usize,
}

/// S3 location parsed from an address bar or launch parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Url {
    pub bucket: String,
    pub key: String,
}

impl S3Url {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse an S3 URL (supports s3:// and https:// formats)
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();

        if let Some(rest) = url.strip_prefix("s3://") {
            return Self::from_bucket_path(rest);
        }

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return None;
        }

        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        if !host.ends_with(".amazonaws.com") {
            return None;
        }
        let path = parsed.path().trim_start_matches('/');

        // Virtual-hosted style: bucket.s3.region.amazonaws.com/key
        if let Some((bucket, _)) = host.split_once(".s3.") {
            if !bucket.is_empty() {
                return Some(Self::new(bucket, path));
            }
        }

        // Path style: s3.region.amazonaws.com/bucket/key
        if host.starts_with("s3.") || host.starts_with("s3-") {
            return Self::from_bucket_path(path);
        }

        None
    }

    fn from_bucket_path(rest: &str) -> Option<Self> {
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return None;
        }
        Some(Self::new(bucket, key))
    }

    /// Whether the key addresses a folder (bucket root included)
    pub fn is_folder(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Convert to s3:// URL format
    pub fn to_s3_url(&self) -> String {
        if self.key.is_empty() {
            format!("s3://{}", self.bucket)
        } else {
            format!("s3://{}/{}", self.bucket, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_url_parse_s3_scheme() {
        let url = S3Url::parse("s3://my-bucket/path/to/file.txt").unwrap();
        assert_eq!(url.bucket, "my-bucket");
        assert_eq!(url.key, "path/to/file.txt");
        assert!(!url.is_folder());
    }

    #[test]
    fn test_s3_url_parse_bucket_root() {
        let url = S3Url::parse("s3://my-bucket").unwrap();
        assert_eq!(url.key, "");
        assert!(url.is_folder());

        let url = S3Url::parse("s3://my-bucket/").unwrap();
        assert_eq!(url.key, "");
    }

    #[test]
    fn test_s3_url_parse_https_styles() {
        let url = S3Url::parse("https://my-bucket.s3.eu-west-1.amazonaws.com/docs/a.md").unwrap();
        assert_eq!(url, S3Url::new("my-bucket", "docs/a.md"));

        let url = S3Url::parse("https://s3.eu-west-1.amazonaws.com/my-bucket/docs/").unwrap();
        assert_eq!(url, S3Url::new("my-bucket", "docs/"));
        assert!(url.is_folder());

        let url = S3Url::parse("http://my-bucket.s3.us-east-1.amazonaws.com/file.txt").unwrap();
        assert_eq!(url.bucket, "my-bucket");
    }

    #[test]
    fn test_s3_url_parse_invalid() {
        assert!(S3Url::parse("https://example.com/file.txt").is_none());
        assert!(S3Url::parse("ftp://bucket/key").is_none());
        assert!(S3Url::parse("s3://").is_none());
        assert!(S3Url::parse("not-a-url").is_none());
        assert!(S3Url::parse("").is_none());
    }

    #[test]
    fn test_s3_url_round_trip_display() {
        assert_eq!(S3Url::new("b", "folder/file.txt").to_s3_url(), "s3://b/folder/file.txt");
        assert_eq!(S3Url::new("b", "").to_s3_url(), "s3://b");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("path/to/myfile.txt"), "myfile.txt");
        assert_eq!(display_name("myfile.txt"), "myfile.txt");
        assert_eq!(display_name("path/to/folder/"), "folder");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_parent_prefix() {
        assert_eq!(parent_prefix("notes/plan.json"), "notes/");
        assert_eq!(parent_prefix("a/b/c.txt"), "a/b/");
        assert_eq!(parent_prefix("root.txt"), "");
        assert_eq!(parent_prefix("a/b/"), "a/");
        assert_eq!(parent_prefix("a/"), "");
    }

    #[test]
    fn test_folder_item() {
        let item = ObjectItem::folder("logs/2024/");
        assert!(item.is_folder());
        assert_eq!(item.name, "2024");
        assert_eq!(item.size_bytes, 0);
        assert!(item.last_modified.is_none());
    }
}
