use crate::s3::bucket::Bucket;
use crate::s3::error::StorageError;
use crate::s3::storage::Storage;
use tracing::{info, warn};

/// Presence and size of one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStatus {
    pub bucket: Bucket,
    pub exists: bool,
    /// `None` when the bucket is missing or could not be listed
    pub file_count: Option<usize>,
}

/// Check that all four buckets exist and count their files.
///
/// Missing or unlistable buckets are logged and reported, never fatal. Only a
/// failure to reach the store at all is returned as an error.
pub async fn verify_buckets<S: Storage + ?Sized>(
    storage: &S,
) -> Result<Vec<BucketStatus>, StorageError> {
    let mut statuses = Vec::with_capacity(Bucket::ALL.len());

    for bucket in Bucket::ALL {
        let exists = match storage.has_bucket(bucket).await {
            Ok(exists) => exists,
            Err(e @ StorageError::ConnectionError(_)) => return Err(e),
            Err(e) => {
                warn!("Could not check bucket '{}': {}", bucket, e);
                false
            }
        };

        if !exists {
            warn!("Bucket '{}' is missing", bucket);
            statuses.push(BucketStatus {
                bucket,
                exists,
                file_count: None,
            });
            continue;
        }

        let file_count = match storage.list(bucket, "").await {
            Ok(objects) => {
                info!("Bucket '{}' holds {} files", bucket, objects.len());
                Some(objects.len())
            }
            Err(e) => {
                warn!("Failed to list bucket '{}': {}", bucket, e);
                None
            }
        };

        statuses.push(BucketStatus {
            bucket,
            exists,
            file_count,
        });
    }

    Ok(statuses)
}
