//! Raw storage operations the gateway is built on
//!
//! A backend knows how to fetch one object and list one page of keys.
//! Classification, sorting and search live in [`super::Gateway`], so every
//! backend (the SDK client, the in-memory store) behaves identically.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::GatewayError;

/// Object body plus the metadata the classifier needs
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// One listing page request
#[derive(Debug, Clone, Copy)]
pub struct ListPageRequest<'a> {
    pub bucket: &'a str,
    pub prefix: &'a str,
    /// `Some("/")` groups nested keys into common prefixes
    pub delimiter: Option<&'a str>,
    pub continuation_token: Option<&'a str>,
    pub max_keys: i32,
}

/// A key returned by a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListedObject {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One listing page response
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub common_prefixes: Vec<String>,
    pub objects: Vec<ListedObject>,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Fetch a single object
    async fn fetch(&self, bucket: &str, key: &str) -> Result<FetchedObject, GatewayError>;

    /// List one page of keys
    async fn list_page(&self, request: ListPageRequest<'_>) -> Result<ListPage, GatewayError>;
}
