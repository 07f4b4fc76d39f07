//! Local message channel between the UI side and the gateway
//!
//! The store (and with it the credentials and SDK client) lives inside a
//! spawned task. The UI side only holds a [`GatewayClient`], which can send
//! the three request kinds and await their replies. Each request is served
//! on its own task, so overlapping requests race and resolve in any order.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{GatewayError, ObjectStore};
use crate::s3::types::{ListResult, ObjectResult, SearchResult};

const CHANNEL_CAPACITY: usize = 32;

type Reply<T> = oneshot::Sender<Result<T, GatewayError>>;

/// A request crossing the channel, carrying its reply slot
#[derive(Debug)]
pub enum GatewayRequest {
    GetObject {
        bucket: String,
        key: String,
        reply: Reply<ObjectResult>,
    },
    ListObjects {
        bucket: String,
        prefix: String,
        reply: Reply<ListResult>,
    },
    SearchObjects {
        bucket: String,
        term: String,
        prefix: String,
        reply: Reply<SearchResult>,
    },
}

impl GatewayRequest {
    /// Channel name of the operation
    pub fn operation(&self) -> &'static str {
        match self {
            GatewayRequest::GetObject { .. } => "get-object",
            GatewayRequest::ListObjects { .. } => "list-objects",
            GatewayRequest::SearchObjects { .. } => "search-objects",
        }
    }

    async fn handle<S: ObjectStore + ?Sized>(self, store: &S) {
        // A dropped receiver means the caller gave up; nothing to report
        match self {
            GatewayRequest::GetObject { bucket, key, reply } => {
                let _ = reply.send(store.get_object(&bucket, &key).await);
            }
            GatewayRequest::ListObjects {
                bucket,
                prefix,
                reply,
            } => {
                let _ = reply.send(store.list_objects(&bucket, &prefix).await);
            }
            GatewayRequest::SearchObjects {
                bucket,
                term,
                prefix,
                reply,
            } => {
                let _ = reply.send(store.search_objects(&bucket, &term, &prefix).await);
            }
        }
    }
}

/// UI-side handle to the isolated gateway task
#[derive(Debug, Clone)]
pub struct GatewayClient {
    tx: mpsc::Sender<GatewayRequest>,
}

/// Move `store` into a gateway task and return the handle that talks to it.
///
/// The task ends once every [`GatewayClient`] clone has been dropped.
pub fn spawn<S: ObjectStore + 'static>(store: S) -> (GatewayClient, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = tokio::spawn(serve(Arc::new(store), rx));
    (GatewayClient { tx }, handle)
}

async fn serve<S: ObjectStore + 'static>(store: Arc<S>, mut rx: mpsc::Receiver<GatewayRequest>) {
    tracing::debug!("Object store gateway started");
    while let Some(request) = rx.recv().await {
        tracing::debug!("Gateway request: {}", request.operation());
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            request.handle(store.as_ref()).await;
        });
    }
    tracing::debug!("Object store gateway stopped");
}

impl GatewayClient {
    async fn call<T: Send>(
        &self,
        build: impl FnOnce(Reply<T>) -> GatewayRequest + Send,
    ) -> Result<T, GatewayError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| GatewayError::ChannelClosed)?;
        response.await.map_err(|_| GatewayError::ChannelClosed)?
    }
}

#[async_trait]
impl ObjectStore for GatewayClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectResult, GatewayError> {
        self.call(|reply| GatewayRequest::GetObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reply,
        })
        .await
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<ListResult, GatewayError> {
        self.call(|reply| GatewayRequest::ListObjects {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            reply,
        })
        .await
    }

    async fn search_objects(
        &self,
        bucket: &str,
        term: &str,
        within_prefix: &str,
    ) -> Result<SearchResult, GatewayError> {
        self.call(|reply| GatewayRequest::SearchObjects {
            bucket: bucket.to_string(),
            term: term.to_string(),
            prefix: within_prefix.to_string(),
            reply,
        })
        .await
    }
}
