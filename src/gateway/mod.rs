//! Object Store Gateway
//!
//! The only component that talks to object storage. It exposes three
//! request/response operations to the UI side:
//! - [`ObjectStore::get_object`] - fetch and classify one object
//! - [`ObjectStore::list_objects`] - one delimited listing level
//! - [`ObjectStore::search_objects`] - bounded paginated key search
//!
//! [`Gateway`] implements them over any [`ObjectBackend`]; [`channel`]
//! isolates a store behind a message channel.

pub mod backend;
pub mod channel;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::classify::{classify, FileCategory};
use crate::s3::types::{display_name, ListResult, ObjectItem, ObjectPayload, ObjectResult, SearchResult};

pub use backend::{FetchedObject, ListPage, ListPageRequest, ListedObject, ObjectBackend};
pub use channel::{GatewayClient, GatewayRequest};

/// Search stops once this many matches have been collected
pub const SEARCH_RESULT_LIMIT: usize = 100;

/// Keys requested per search page
pub const SEARCH_PAGE_SIZE: i32 = 1000;

/// Keys requested by a single folder listing
pub const LIST_PAGE_SIZE: i32 = 1000;

const PATH_DELIMITER: &str = "/";

/// Failures surfaced to the panes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Key does not exist; callers retry the key as a folder prefix
    #[error("NoSuchKey: {0}")]
    NotFound(String),

    #[error("AccessDenied: {0}")]
    AccessDenied(String),

    #[error("{0}")]
    Unknown(String),

    #[error("object store gateway is not running")]
    ChannelClosed,
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }

    /// Map a service error code (and HTTP status, when there is no code)
    pub fn from_service(code: Option<&str>, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("NoSuchKey") | Some("NotFound") => GatewayError::NotFound(message),
            Some("AccessDenied") | Some("Forbidden") | Some("AllAccessDisabled") => {
                GatewayError::AccessDenied(message)
            }
            Some(code) => GatewayError::Unknown(format!("{}: {}", code, message)),
            None => match status {
                Some(404) => GatewayError::NotFound(message),
                Some(403) => GatewayError::AccessDenied(message),
                _ => GatewayError::Unknown(message),
            },
        }
    }
}

/// The operations the UI process may invoke
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResult, GatewayError>;

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult, GatewayError>;

    async fn search_objects(
        &self,
        bucket: &str,
        term: &str,
        within_prefix: &str,
    ) -> Result<SearchResult, GatewayError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResult, GatewayError> {
        (**self).get_object(bucket, key).await
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult, GatewayError> {
        (**self).list_objects(bucket, prefix).await
    }

    async fn search_objects(
        &self,
        bucket: &str,
        term: &str,
        within_prefix: &str,
    ) -> Result<SearchResult, GatewayError> {
        (**self).search_objects(bucket, term, within_prefix).await
    }
}

/// Classifying gateway over a raw backend
pub struct Gateway<B> {
    backend: B,
}

impl<B: ObjectBackend> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: ObjectBackend> ObjectStore for Gateway<B> {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResult, GatewayError> {
        tracing::debug!("get-object bucket={} key={}", bucket, key);
        let fetched = self.backend.fetch(bucket, key).await.map_err(|e| {
            tracing::error!("Error fetching s3://{}/{}: {}", bucket, key, e);
            e
        })?;
        Ok(build_object_result(key, fetched))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult, GatewayError> {
        tracing::debug!("list-objects bucket={} prefix={:?}", bucket, prefix);
        let page = self
            .backend
            .list_page(ListPageRequest {
                bucket,
                prefix,
                delimiter: Some(PATH_DELIMITER),
                continuation_token: None,
                max_keys: LIST_PAGE_SIZE,
            })
            .await
            .map_err(|e| {
                tracing::error!("Error listing s3://{}/{}: {}", bucket, prefix, e);
                e
            })?;

        let folders = page
            .common_prefixes
            .iter()
            .map(|p| ObjectItem::folder(p))
            .collect();

        let mut files: Vec<ObjectItem> = page
            .objects
            .into_iter()
            .filter(|obj| obj.key != prefix)
            .map(file_item)
            .collect();
        sort_most_recent_first(&mut files);

        Ok(ListResult {
            folders,
            files,
            prefix: prefix.to_string(),
        })
    }

    async fn search_objects(
        &self,
        bucket: &str,
        term: &str,
        within_prefix: &str,
    ) -> Result<SearchResult, GatewayError> {
        tracing::debug!(
            "search-objects bucket={} term={:?} prefix={:?}",
            bucket,
            term,
            within_prefix
        );
        if term.trim().is_empty() {
            return Ok(SearchResult::default());
        }
        let needle = term.to_lowercase();

        let mut matches = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .backend
                .list_page(ListPageRequest {
                    bucket,
                    prefix: within_prefix,
                    delimiter: None,
                    continuation_token: token.as_deref(),
                    max_keys: SEARCH_PAGE_SIZE,
                })
                .await?;
            pages += 1;

            matches.extend(
                page.objects
                    .into_iter()
                    .filter(|obj| key_matches(&obj.key, &needle))
                    .map(file_item),
            );

            token = page.next_token;
            // The whole page is kept, so the count can run past the limit
            if matches.len() >= SEARCH_RESULT_LIMIT || token.is_none() {
                break;
            }
        }

        sort_most_recent_first(&mut matches);
        let total_found = matches.len();
        matches.truncate(SEARCH_RESULT_LIMIT);

        tracing::debug!("search scanned {} pages, {} matches", pages, total_found);

        Ok(SearchResult {
            results: matches,
            total_found,
        })
    }
}

fn key_matches(key: &str, needle: &str) -> bool {
    key.to_lowercase().contains(needle) || display_name(key).to_lowercase().contains(needle)
}

fn file_item(obj: ListedObject) -> ObjectItem {
    // Extensionless keys are treated as opaque binaries
    let hint = if obj.key.contains('.') {
        None
    } else {
        Some("application/octet-stream")
    };
    ObjectItem {
        category: classify(&obj.key, hint),
        name: display_name(&obj.key).to_string(),
        key: obj.key,
        size_bytes: obj.size,
        last_modified: obj.last_modified,
    }
}

/// Most recent first; items without a timestamp sink to the end
pub fn sort_most_recent_first(items: &mut [ObjectItem]) {
    items.sort_by(|a, b| match (&a.last_modified, &b.last_modified) {
        (Some(a), Some(b)) => b.cmp(a),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    });
}

fn build_object_result(key: &str, fetched: FetchedObject) -> ObjectResult {
    let content_type = fetched.content_type;
    let category = match classify(key, content_type.as_deref()) {
        FileCategory::Folder => FileCategory::Other,
        category => category,
    };

    if category.is_binary() {
        return ObjectResult {
            category,
            payload: ObjectPayload::Image(STANDARD.encode(&fetched.body)),
            key: key.to_string(),
            content_type,
            parse_error: None,
        };
    }

    let text = String::from_utf8_lossy(&fetched.body).into_owned();

    if category == FileCategory::Json {
        match serde_json::from_str(&text) {
            Ok(value) => {
                return ObjectResult {
                    category,
                    payload: ObjectPayload::Json(value),
                    key: key.to_string(),
                    content_type,
                    parse_error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Invalid JSON in {}: {}", key, e);
                return ObjectResult {
                    category: FileCategory::Other,
                    payload: ObjectPayload::Text(text),
                    key: key.to_string(),
                    content_type,
                    parse_error: Some(format!("Invalid JSON format: {}", e)),
                };
            }
        }
    }

    ObjectResult {
        category,
        payload: ObjectPayload::Text(text),
        key: key.to_string(),
        content_type,
        parse_error: None,
    }
}
