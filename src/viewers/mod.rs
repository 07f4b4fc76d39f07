//! Viewer components
//!
//! Each viewer reads an [`ObjectResult`] and produces a view model; none of
//! them feed anything back into the workspace.

pub mod html;
pub mod image;
pub mod json;
pub mod json_query;
pub mod markdown;
pub mod text;

use crate::classify::FileCategory;
use crate::s3::types::{ObjectPayload, ObjectResult};

pub use html::{HtmlViewMode, HtmlViewer};
pub use self::image::ImageViewer;
pub use json::{JsonTree, JsonView, JsonViewer};
pub use json_query::{JsonQuery, QueryError, QueryMode, QueryOutcome};
pub use markdown::MarkdownDocument;
pub use text::{SyntaxType, TextViewer};

/// The viewer chosen for a fetched object
#[derive(Debug, Clone)]
pub enum ViewerContent {
    Json(JsonView),
    Markdown(MarkdownDocument),
    Html(HtmlViewer),
    Image(ImageViewer),
    Text(TextViewer),
}

impl ViewerContent {
    /// Pick a viewer by category. A payload that does not fit its category
    /// (e.g. a JSON file that failed to parse) falls back to text.
    pub fn for_object(object: &ObjectResult) -> Self {
        let file_name = object.file_name();
        match (object.category, &object.payload) {
            (FileCategory::Json, ObjectPayload::Json(value)) => ViewerContent::Json(JsonView::new(value.clone())),
            (FileCategory::Image, ObjectPayload::Image(encoded)) => {
                ViewerContent::Image(ImageViewer::new(file_name, encoded.clone(), object.content_type.as_deref()))
            }
            (FileCategory::Markdown, ObjectPayload::Text(text)) => ViewerContent::Markdown(markdown::render(text)),
            (FileCategory::Html, ObjectPayload::Text(text)) => ViewerContent::Html(HtmlViewer::new(file_name, text.clone())),
            (_, payload) => {
                let text = match payload {
                    ObjectPayload::Json(value) => json::pretty(value),
                    ObjectPayload::Text(text) => text.clone(),
                    ObjectPayload::Image(encoded) => encoded.clone(),
                };
                ViewerContent::Text(TextViewer::new(file_name, &text, object.parse_error.clone()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ViewerContent::Json(_) => "json",
            ViewerContent::Markdown(_) => "markdown",
            ViewerContent::Html(_) => "html",
            ViewerContent::Image(_) => "image",
            ViewerContent::Text(_) => "text",
        }
    }
}
