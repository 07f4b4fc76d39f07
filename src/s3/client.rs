//! AWS S3 client wrapper

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;

use crate::gateway::{FetchedObject, GatewayError, ListPage, ListPageRequest, ListedObject, ObjectBackend};

/// Connection settings for the SDK client.
///
/// Everything is optional: with the defaults the standard credential chain
/// (environment, shared profiles, SSO, instance roles) and region resolution apply.
#[derive(Debug, Clone, Default)]
pub struct S3ClientConfig {
    /// Named profile from ~/.aws/config
    pub profile: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack, ...)
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 client wrapper with the read operations the gateway needs
pub struct S3Client {
    client: Client,
}

impl S3Client {
    /// Create a client from explicit connection settings
    pub async fn with_config(config: S3ClientConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                "s3-navigator-static",
            ));
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::info!(
            "S3 client ready (profile={:?}, region={:?}, endpoint={:?})",
            config.profile,
            sdk_config.region(),
            config.endpoint_url
        );

        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }

    /// Underlying SDK client
    pub fn sdk(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectBackend for S3Client {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<FetchedObject, GatewayError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let content_type = response.content_type().map(str::to_string);
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| GatewayError::Unknown(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        Ok(FetchedObject { body, content_type })
    }

    async fn list_page(&self, request: ListPageRequest<'_>) -> Result<ListPage, GatewayError> {
        let mut call = self
            .client
            .list_objects_v2()
            .bucket(request.bucket)
            .prefix(request.prefix)
            .max_keys(request.max_keys);

        if let Some(delimiter) = request.delimiter {
            call = call.delimiter(delimiter);
        }
        if let Some(token) = request.continuation_token {
            call = call.continuation_token(token);
        }

        let response = call.send().await.map_err(map_sdk_error)?;

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        let objects = response
            .contents()
            .iter()
            .map(|obj| ListedObject {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().unwrap_or(0).max(0) as u64,
                last_modified: obj.last_modified().and_then(|d| {
                    chrono::DateTime::from_timestamp(d.secs(), d.subsec_nanos())
                }),
            })
            .collect();

        Ok(ListPage {
            common_prefixes,
            objects,
            next_token: response.next_continuation_token().map(str::to_string),
        })
    }
}

/// Translate an SDK failure into the gateway taxonomy
fn map_sdk_error<E>(err: SdkError<E>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    GatewayError::from_service(code.as_deref(), status, message)
}
