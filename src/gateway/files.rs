use super::{Entity, Gateway, GatewayError};
use crate::db::Database;
use crate::s3::{Bucket, Storage, StorageError, UploadedObject};
use bytes::Bytes;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Object key for a new upload: `<unix millis>-<name with whitespace runs as '-'>`
pub fn object_key(file_name: &str) -> String {
    object_key_at(file_name, Utc::now().timestamp_millis())
}

pub fn object_key_at(file_name: &str, millis: i64) -> String {
    format!("{}-{}", millis, WHITESPACE_RE.replace_all(file_name, "-"))
}

impl<D: Database, S: Storage> Gateway<D, S> {
    /// Upload a file under a fresh object key
    pub async fn store_file(
        &self,
        entity: Entity,
        bucket: Bucket,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedObject, GatewayError> {
        let key = object_key(file_name);
        debug!("Storing {} as {}/{}", file_name, bucket, key);
        self.storage
            .upload(bucket, &key, data, content_type)
            .await
            .map_err(|e| GatewayError::transport(entity, "upload", Some(&key), e))
    }

    /// Delete a stored file given the bucket name recorded on an entity
    pub async fn remove_file(
        &self,
        entity: Entity,
        bucket: &str,
        path: &str,
    ) -> Result<(), GatewayError> {
        let bucket: Bucket = bucket.parse().map_err(|_| {
            GatewayError::transport(
                entity,
                "delete",
                Some(path),
                StorageError::UnknownBucket(bucket.to_string()),
            )
        })?;

        self.storage
            .delete(bucket, path)
            .await
            .map_err(|e| GatewayError::transport(entity, "delete", Some(path), e))
    }
}
