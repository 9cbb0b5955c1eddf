pub mod bucket;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod inventory;
#[allow(clippy::module_inception)]
pub mod s3;
pub mod storage;

pub use bucket::Bucket;
pub use error::StorageError;
#[cfg(test)]
pub use fake::FakeStorage;
pub use inventory::{verify_buckets, BucketStatus};
pub use s3::S3Storage;
pub use storage::{object_url, ObjectInfo, Storage, UploadedObject};
