//! Object storage access
//!
//! This module provides:
//! - [`client::S3Client`] - AWS SDK wrapper implementing the raw backend operations
//! - [`memory::MemoryBackend`] - in-memory backend with the same listing contract
//! - [`types`] - shared data types (ObjectItem, ObjectResult, ListResult, S3Url)

pub mod client;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use client::{S3Client, S3ClientConfig};
pub use memory::MemoryBackend;
pub use types::{ListResult, ObjectItem, ObjectPayload, ObjectResult, S3Url, SearchResult};
