use crate::s3::bucket::Bucket;
use crate::s3::error::StorageError;
use crate::s3::storage::{object_url, ObjectInfo, Storage, UploadedObject};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

struct FakeObject {
    data: Bytes,
    content_type: String,
    created_at: DateTime<Utc>,
}

/// `FakeStorage` is an in-memory implementation of the `Storage` trait for testing purposes.
/// It allows simulating various storage scenarios, including successful operations and failures.
#[derive(Clone)]
pub struct FakeStorage {
    objects: Arc<Mutex<HashMap<(Bucket, String), FakeObject>>>,
    missing_buckets: Arc<Mutex<HashSet<Bucket>>>,
    fail_upload_patterns: Arc<Mutex<Vec<String>>>,
    fail_delete_keys: Arc<Mutex<HashSet<String>>>,
    uploads: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
    base_url: Url,
}

#[allow(dead_code)]
impl FakeStorage {
    /// Create a new FakeStorage with all four buckets present
    pub fn new() -> Self {
        FakeStorage {
            objects: Arc::new(Mutex::new(HashMap::new())),
            missing_buckets: Arc::new(Mutex::new(HashSet::new())),
            fail_upload_patterns: Arc::new(Mutex::new(Vec::new())),
            fail_delete_keys: Arc::new(Mutex::new(HashSet::new())),
            uploads: Arc::new(AtomicUsize::new(0)),
            deletes: Arc::new(AtomicUsize::new(0)),
            base_url: Url::parse("https://storage.test").expect("valid fake base url"),
        }
    }

    /// Make every upload whose key contains `pattern` fail
    pub async fn fake_fail_uploads_matching(&self, pattern: &str) {
        let mut patterns = self.fail_upload_patterns.lock().await;
        patterns.push(pattern.to_string());
    }

    /// Make deleting `key` fail in any bucket
    pub async fn fake_fail_delete(&self, key: &str) {
        let mut keys = self.fail_delete_keys.lock().await;
        keys.insert(key.to_string());
    }

    /// Simulate a bucket that was never provisioned
    pub async fn fake_remove_bucket(&self, bucket: Bucket) {
        let mut missing = self.missing_buckets.lock().await;
        missing.insert(bucket);
    }

    /// Store an object directly without counting it as an upload
    pub async fn fake_add_object(&self, bucket: Bucket, key: &str, data: Bytes) {
        let mut objects = self.objects.lock().await;
        objects.insert(
            (bucket, key.to_string()),
            FakeObject {
                data,
                content_type: "application/octet-stream".to_string(),
                created_at: Utc::now(),
            },
        );
    }

    pub async fn contains(&self, bucket: Bucket, key: &str) -> bool {
        let objects = self.objects.lock().await;
        objects.contains_key(&(bucket, key.to_string()))
    }

    pub async fn get(&self, bucket: Bucket, key: &str) -> Option<Bytes> {
        let objects = self.objects.lock().await;
        objects
            .get(&(bucket, key.to_string()))
            .map(|object| object.data.clone())
    }

    pub async fn object_count(&self, bucket: Bucket) -> usize {
        let objects = self.objects.lock().await;
        objects.keys().filter(|(b, _)| *b == bucket).count()
    }

    /// Number of successful uploads
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Number of delete calls, successful or not
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    async fn ensure_bucket(&self, bucket: Bucket) -> Result<(), StorageError> {
        let missing = self.missing_buckets.lock().await;
        if missing.contains(&bucket) {
            return Err(StorageError::UnknownBucket(bucket.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        self.ensure_bucket(bucket).await?;

        {
            let patterns = self.fail_upload_patterns.lock().await;
            if patterns.iter().any(|pattern| key.contains(pattern.as_str())) {
                return Err(StorageError::UploadError(
                    format!("{bucket}/{key}"),
                    "simulated upload failure".to_string(),
                ));
            }
        }

        let mut objects = self.objects.lock().await;
        let entry = (bucket, key.to_string());
        if objects.contains_key(&entry) {
            return Err(StorageError::AlreadyExists(format!("{bucket}/{key}")));
        }
        objects.insert(
            entry,
            FakeObject {
                data,
                content_type: content_type.to_string(),
                created_at: Utc::now(),
            },
        );
        self.uploads.fetch_add(1, Ordering::SeqCst);

        Ok(UploadedObject {
            path: key.to_string(),
            public_url: self.public_url(bucket, key),
        })
    }

    async fn delete(&self, bucket: Bucket, key: &str) -> Result<(), StorageError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.ensure_bucket(bucket).await?;

        {
            let keys = self.fail_delete_keys.lock().await;
            if keys.contains(key) {
                return Err(StorageError::DeleteError(
                    format!("{bucket}/{key}"),
                    "simulated delete failure".to_string(),
                ));
            }
        }

        // Deleting a missing key succeeds, as it does on S3
        let mut objects = self.objects.lock().await;
        objects.remove(&(bucket, key.to_string()));
        Ok(())
    }

    async fn list(&self, bucket: Bucket, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        self.ensure_bucket(bucket).await?;

        let objects = self.objects.lock().await;
        let mut listed: Vec<ObjectInfo> = objects
            .iter()
            .filter(|((b, key), _)| *b == bucket && key.starts_with(prefix))
            .map(|((_, key), object)| ObjectInfo {
                name: key.clone(),
                size: Some(object.data.len() as i64),
                mimetype: Some(object.content_type.clone()),
                created_at: Some(object.created_at),
                updated_at: Some(object.created_at),
            })
            .collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    async fn has_bucket(&self, bucket: Bucket) -> Result<bool, StorageError> {
        let missing = self.missing_buckets.lock().await;
        Ok(!missing.contains(&bucket))
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        object_url(&self.base_url, bucket, key)
    }
}

impl Default for FakeStorage {
    fn default() -> Self {
        Self::new()
    }
}
