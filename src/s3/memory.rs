//! In-memory object backend
//!
//! Mirrors the S3 listing contract (lexicographic keys, delimiter grouping,
//! continuation tokens, `max_keys` counting both keys and common prefixes)
//! so the gateway and workspace can be exercised without a network.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::gateway::{FetchedObject, GatewayError, ListPage, ListPageRequest, ListedObject, ObjectBackend};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: Option<String>,
    last_modified: DateTime<Utc>,
}

#[derive(Default)]
struct Buckets {
    objects: BTreeMap<String, BTreeMap<String, StoredObject>>,
    denied: HashSet<String>,
}

/// Thread-safe in-memory bucket store
#[derive(Default)]
pub struct MemoryBackend {
    buckets: RwLock<Buckets>,
    list_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object stamped with the current time
    pub fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: Option<&str>) {
        self.put_at(bucket, key, body, content_type, Utc::now());
    }

    /// Store an object with an explicit modification time
    pub fn put_at(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        last_modified: DateTime<Utc>,
    ) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets.objects.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                body: Bytes::from(body),
                content_type: content_type.map(str::to_string),
                last_modified,
            },
        );
    }

    /// Make every request against `bucket` fail with AccessDenied
    pub fn deny_bucket(&self, bucket: &str) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets.denied.insert(bucket.to_string());
    }

    /// Number of listing pages served so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_access(buckets: &Buckets, bucket: &str) -> Result<(), GatewayError> {
        if buckets.denied.contains(bucket) {
            return Err(GatewayError::AccessDenied("Access Denied".to_string()));
        }
        if !buckets.objects.contains_key(bucket) {
            return Err(GatewayError::Unknown(format!(
                "NoSuchBucket: The specified bucket does not exist: {}",
                bucket
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<FetchedObject, GatewayError> {
        let buckets = self.buckets.read().unwrap_or_else(|e| e.into_inner());
        Self::check_access(&buckets, bucket)?;

        let stored = buckets
            .objects
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .ok_or_else(|| GatewayError::NotFound("The specified key does not exist.".to_string()))?;

        Ok(FetchedObject {
            body: stored.body.clone(),
            content_type: stored.content_type.clone(),
        })
    }

    async fn list_page(&self, request: ListPageRequest<'_>) -> Result<ListPage, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let buckets = self.buckets.read().unwrap_or_else(|e| e.into_inner());
        Self::check_access(&buckets, request.bucket)?;

        let max_keys = request.max_keys.max(1) as usize;
        let start_after = request.continuation_token.unwrap_or("");
        let mut page = ListPage::default();
        let mut returned = 0usize;
        let mut last_entry = String::new();

        let objects = buckets.objects.get(request.bucket).into_iter().flatten();
        for (key, stored) in objects {
            if !key.starts_with(request.prefix) || key.as_str() <= start_after {
                continue;
            }
            // Keys rolled up into a common prefix already handed out
            if let Some(delimiter) = request.delimiter {
                if !start_after.is_empty() && start_after.ends_with(delimiter) && key.starts_with(start_after) {
                    continue;
                }
            }

            let grouped = request.delimiter.and_then(|delimiter| {
                let rest = &key[request.prefix.len()..];
                rest.find(delimiter)
                    .map(|idx| format!("{}{}", request.prefix, &rest[..idx + delimiter.len()]))
            });

            if let Some(common) = &grouped {
                if page.common_prefixes.last() == Some(common) {
                    continue;
                }
            }

            if returned == max_keys {
                page.next_token = Some(last_entry);
                return Ok(page);
            }

            match grouped {
                Some(common) => {
                    last_entry = common.clone();
                    page.common_prefixes.push(common);
                }
                None => {
                    last_entry = key.clone();
                    page.objects.push(ListedObject {
                        key: key.clone(),
                        size: stored.body.len() as u64,
                        last_modified: Some(stored.last_modified),
                    });
                }
            }
            returned += 1;
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(prefix: &'a str, delimiter: Option<&'a str>, token: Option<&'a str>, max_keys: i32) -> ListPageRequest<'a> {
        ListPageRequest {
            bucket: "b",
            prefix,
            delimiter,
            continuation_token: token,
            max_keys,
        }
    }

    #[tokio::test]
    async fn test_delimiter_groups_common_prefixes() {
        let backend = MemoryBackend::new();
        for key in ["a/1", "a/2", "b/x/1", "c.txt"] {
            backend.put("b", key, b"x".to_vec(), None);
        }

        let page = backend.list_page(request("", Some("/"), None, 1000)).await.unwrap();
        assert_eq!(page.common_prefixes, vec!["a/", "b/"]);
        assert_eq!(page.objects.len(), 1);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn test_pagination_resumes_after_token() {
        let backend = MemoryBackend::new();
        for i in 0..5 {
            backend.put("b", &format!("k{}", i), b"x".to_vec(), None);
        }

        let first = backend.list_page(request("", None, None, 2)).await.unwrap();
        assert_eq!(first.objects.len(), 2);
        let token = first.next_token.unwrap();
        assert_eq!(token, "k1");

        let second = backend.list_page(request("", None, Some(&token), 2)).await.unwrap();
        assert_eq!(second.objects[0].key, "k2");

        let last = backend.list_page(request("", None, Some("k3"), 2)).await.unwrap();
        assert_eq!(last.objects.len(), 1);
        assert!(last.next_token.is_none());
        assert_eq!(backend.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_pagination_skips_grouped_prefix() {
        let backend = MemoryBackend::new();
        for key in ["a/1", "a/2", "b/1", "c"] {
            backend.put("b", key, b"x".to_vec(), None);
        }

        let first = backend.list_page(request("", Some("/"), None, 1)).await.unwrap();
        assert_eq!(first.common_prefixes, vec!["a/"]);
        let token = first.next_token.unwrap();

        let second = backend.list_page(request("", Some("/"), Some(&token), 10)).await.unwrap();
        assert_eq!(second.common_prefixes, vec!["b/"]);
        assert_eq!(second.objects.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_bucket_and_denied_bucket() {
        let backend = MemoryBackend::new();
        let err = backend.fetch("nope", "k").await.unwrap_err();
        assert!(err.to_string().contains("NoSuchBucket"));

        backend.put("locked", "k", b"x".to_vec(), None);
        backend.deny_bucket("locked");
        let err = backend.list_page(ListPageRequest { bucket: "locked", ..request("", None, None, 10) }).await.unwrap_err();
        assert!(matches!(err, GatewayError::AccessDenied(_)));
    }
}
