//! File-type classification
//!
//! Maps an object key (and, as a fallback, its content type) to the
//! rendering category used by the viewers and the folder table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering category of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Folder,
    Json,
    Markdown,
    Html,
    Image,
    Other,
}

const JSON_EXTENSIONS: &[&str] = &["json"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];

impl FileCategory {
    /// Lowercase identifier, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Folder => "folder",
            FileCategory::Json => "json",
            FileCategory::Markdown => "markdown",
            FileCategory::Html => "html",
            FileCategory::Image => "image",
            FileCategory::Other => "other",
        }
    }

    /// Capitalized label for the folder table "Type" column
    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Folder => "Folder",
            FileCategory::Json => "Json",
            FileCategory::Markdown => "Markdown",
            FileCategory::Html => "Html",
            FileCategory::Image => "Image",
            FileCategory::Other => "Other",
        }
    }

    /// Whether the object body is shipped as base64 rather than text
    pub fn is_binary(&self) -> bool {
        matches!(self, FileCategory::Image)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of the last path segment, without the dot.
///
/// A leading dot (`.env`, `.json`) is a hidden file name, not an extension.
pub fn extension(key: &str) -> Option<String> {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => Some(name[idx + 1..].to_lowercase()),
        _ => None,
    }
}

/// Classify a key, consulting the content type only when the extension is unknown
pub fn classify(key: &str, content_type: Option<&str>) -> FileCategory {
    if key.ends_with('/') {
        return FileCategory::Folder;
    }

    if let Some(ext) = extension(key) {
        let ext = ext.as_str();
        if JSON_EXTENSIONS.contains(&ext) {
            return FileCategory::Json;
        }
        if MARKDOWN_EXTENSIONS.contains(&ext) {
            return FileCategory::Markdown;
        }
        if HTML_EXTENSIONS.contains(&ext) {
            return FileCategory::Html;
        }
        if IMAGE_EXTENSIONS.contains(&ext) {
            return FileCategory::Image;
        }
    }

    match content_type {
        Some(ct) if ct.contains("application/json") => FileCategory::Json,
        Some(ct) if ct.contains("text/markdown") => FileCategory::Markdown,
        Some(ct) if ct.contains("text/html") => FileCategory::Html,
        Some(ct) if ct.starts_with("image/") => FileCategory::Image,
        _ => FileCategory::Other,
    }
}
