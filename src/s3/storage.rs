use crate::s3::bucket::Bucket;
use crate::s3::error::StorageError;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    /// Object key inside the bucket
    pub path: String,
    pub public_url: String,
}

/// One entry returned by [`Storage::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub name: String,
    pub size: Option<i64>,
    pub mimetype: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Public URL of `key` in `bucket` under `base`.
///
/// Each path segment is percent-encoded, so names with spaces, `#`, `?`, `%`
/// or non-ASCII characters stay addressable. `/` inside a key separates
/// segments.
pub fn object_url(base: &Url, bucket: Bucket, key: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .push(bucket.as_str())
            .extend(key.split('/'));
    }
    url.to_string()
}

/// Storage trait defining the interface to the bucketed object store
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Upload `data` under `key`. Fails with `AlreadyExists` instead of overwriting.
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError>;

    /// Delete the object stored under `key`
    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError>;

    /// List objects whose key starts with `prefix`
    async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError>;

    /// Check if a bucket exists
    async fn has_bucket(&self, bucket: Bucket) -> Result<bool, StorageError>;

    /// Public URL at which `key` is served
    fn public_url(&self, bucket: Bucket, key: &str) -> String;
}

/// Implementation of Storage trait for Arc<T> where T implements Storage
#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        (**self).upload(bucket, key, data, content_type).await
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        (**self).delete(bucket, key).await
    }

    async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        (**self).list(bucket, prefix).await
    }

    async fn has_bucket(&self, bucket: Bucket) -> Result<bool, StorageError> {
        (**self).has_bucket(bucket).await
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        (**self).public_url(bucket, key)
    }
}
