use crate::config::StorageConfig;
use crate::s3::bucket::Bucket;
use crate::s3::error::StorageError;
use crate::s3::storage::{object_url, ObjectInfo, Storage, UploadedObject};
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use url::Url;

/// Object store backed by any S3-compatible API
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    public_url: Url,
}

impl S3Storage {
    /// Create a new S3Storage instance from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        info!(
            "Creating S3Storage with config: endpoint={:?}, region={}, public_url={}",
            config.endpoint, config.region, config.public_url
        );

        let public_url = Url::parse(&config.public_url).map_err(|e| {
            StorageError::Other(anyhow::anyhow!(
                "Invalid public_url '{}': {}",
                config.public_url,
                e
            ))
        })?;
        if public_url.cannot_be_a_base() {
            return Err(StorageError::Other(anyhow::anyhow!(
                "public_url '{}' cannot carry object paths",
                config.public_url
            )));
        }

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .force_path_style(true);

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "StaticCredentialsProvider",
            );

            s3_config_builder = s3_config_builder.credentials_provider(credentials);
        } else {
            debug!("No static keys configured, using the default credential chain");
            let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
            if let Some(provider) = shared.credentials_provider() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
        }

        if let Some(endpoint) = &config.endpoint {
            info!("Setting custom endpoint: {}", endpoint);
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("Created S3 client for region {}", config.region);

        Ok(Self { client, public_url })
    }
}

fn service_code<E: ProvideErrorMetadata, R>(err: &SdkError<E, R>) -> Option<String> {
    match err {
        SdkError::ServiceError(service_err) => service_err.err().code().map(str::to_string),
        _ => None,
    }
}

fn is_transport_failure<E, R>(err: &SdkError<E, R>) -> bool {
    matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    )
}

fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        debug!(
            "Uploading object {}/{} ({} bytes, {})",
            bucket,
            key,
            data.len(),
            content_type
        );

        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(key)
            .content_type(content_type)
            .if_none_match("*")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let object = format!("{bucket}/{key}");
                match service_code(&e).as_deref() {
                    Some("PreconditionFailed") | Some("ConditionalRequestConflict") => {
                        StorageError::AlreadyExists(object)
                    }
                    Some("NoSuchBucket") => StorageError::UnknownBucket(bucket.to_string()),
                    Some("AccessDenied") => StorageError::AccessDenied(object, e.to_string()),
                    _ if is_transport_failure(&e) => StorageError::ConnectionError(e.to_string()),
                    _ => {
                        error!("Failed to put object '{}': {:?}", object, e);
                        StorageError::UploadError(object, e.to_string())
                    }
                }
            })?;

        debug!("Successfully uploaded object: {}/{}", bucket, key);
        Ok(UploadedObject {
            path: key.to_string(),
            public_url: self.public_url(bucket, key),
        })
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket.as_str())
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let object = format!("{bucket}/{key}");
                match service_code(&e).as_deref() {
                    Some("NoSuchBucket") => StorageError::UnknownBucket(bucket.to_string()),
                    Some("AccessDenied") => StorageError::AccessDenied(object, e.to_string()),
                    _ if is_transport_failure(&e) => StorageError::ConnectionError(e.to_string()),
                    _ => {
                        error!("Error deleting object '{}': {:?}", object, e);
                        StorageError::DeleteError(object, e.to_string())
                    }
                }
            })?;

        debug!("Successfully removed object: {}/{}", bucket, key);
        Ok(())
    }

    async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket.as_str())
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| match service_code(&e).as_deref() {
                    Some("NoSuchBucket") => StorageError::UnknownBucket(bucket.to_string()),
                    _ if is_transport_failure(&e) => StorageError::ConnectionError(e.to_string()),
                    _ => StorageError::Other(anyhow::anyhow!(
                        "Failed to list bucket '{}': {}",
                        bucket,
                        e
                    )),
                })?;

            for object in response.contents() {
                let Some(name) = object.key() else { continue };
                let modified = object.last_modified().and_then(to_chrono);
                objects.push(ObjectInfo {
                    name: name.to_string(),
                    size: object.size(),
                    // ListObjectsV2 does not report content types
                    mimetype: None,
                    created_at: modified,
                    updated_at: modified,
                });
            }

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} objects in {}/{}", objects.len(), bucket, prefix);
        Ok(objects)
    }

    async fn has_bucket(&self, bucket: Bucket) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket.as_str()).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                if let Some(code) = service_code(&e) {
                    debug!("has_bucket error for '{}': code={}", bucket, code);
                    if code == "NoSuchBucket" || code == "NotFound" {
                        return Ok(false);
                    }
                }

                // HeadBucket responses carry no body, so a 404 may come without a code
                let error_str = e.to_string();
                if error_str.contains("NoSuchBucket")
                    || error_str.contains("404")
                    || error_str.contains("NotFound")
                {
                    Ok(false)
                } else if is_transport_failure(&e) {
                    Err(StorageError::ConnectionError(error_str))
                } else {
                    Err(StorageError::Other(anyhow::anyhow!(
                        "Error checking bucket existence: {}",
                        e
                    )))
                }
            }
        }
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        object_url(&self.public_url, bucket, key)
    }
}
