use super::classify::{partition, UploadFile};
use super::progress::BatchProgress;
use crate::db::Database;
use crate::gateway::{Entity, Gateway, GatewayError};
use crate::models::{MediaItem, MediaType};
use crate::s3::{Bucket, Storage};
use crate::youtube;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One file of a batch that could not be uploaded or recorded
#[derive(Debug)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: GatewayError,
}

/// Result of a batch: every file either produced an item or a failure
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub items: Vec<MediaItem>,
    pub failures: Vec<UploadFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.items.len() + self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregate message for the person who started the upload
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!("Uploaded {} files", self.items.len())
        } else {
            format!(
                "Uploaded {} of {} files, {} failed",
                self.items.len(),
                self.total(),
                self.failures.len()
            )
        }
    }
}

/// Photo stored for a speaker profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerPhoto {
    pub url: String,
    pub storage_path: String,
    pub storage_bucket: String,
}

pub struct Uploader<D, S> {
    gateway: Arc<Gateway<D, S>>,
}

impl<D: Database, S: Storage> Uploader<D, S> {
    pub fn new(gateway: Arc<Gateway<D, S>>) -> Self {
        Self { gateway }
    }

    /// Upload a batch of files and record one media item per stored file.
    ///
    /// Categories are processed one after another, files within a category
    /// concurrently. A failing file is reported in the outcome and never stops
    /// the rest of the batch.
    pub async fn upload_batch(
        &self,
        files: Vec<UploadFile>,
        default: MediaType,
        progress: &watch::Sender<u8>,
    ) -> BatchOutcome {
        let tracker = BatchProgress::start(progress, files.len());
        let mut outcome = BatchOutcome::default();

        for (media_type, files) in partition(files, default) {
            debug!("Uploading {} {} files", files.len(), media_type);

            let uploads = files.into_iter().map(|file| {
                let tracker = &tracker;
                async move {
                    let file_name = file.name.clone();
                    let result = self.upload_one(file, media_type).await;
                    tracker.file_done();
                    (file_name, result)
                }
            });

            for (file_name, result) in join_all(uploads).await {
                match result {
                    Ok(item) => outcome.items.push(item),
                    Err(error) => {
                        warn!("Upload of {} failed: {}", file_name, error);
                        outcome.failures.push(UploadFailure { file_name, error });
                    }
                }
            }
        }

        info!("{}", outcome.summary());
        outcome
    }

    async fn upload_one(
        &self,
        file: UploadFile,
        media_type: MediaType,
    ) -> Result<MediaItem, GatewayError> {
        let bucket = media_type.bucket();
        let size = file.data.len() as i64;
        let uploaded = self
            .gateway
            .store_file(
                Entity::MediaItem,
                bucket,
                &file.name,
                file.data,
                &file.content_type,
            )
            .await?;

        let item = MediaItem {
            id: Uuid::new_v4().to_string(),
            media_type,
            name: file.name,
            url: uploaded.public_url.clone(),
            thumbnail: (media_type == MediaType::Photo).then(|| uploaded.public_url.clone()),
            size: Some(size),
            upload_date: Utc::now(),
            is_youtube: false,
            youtube_id: None,
            storage_path: Some(uploaded.path.clone()),
            storage_bucket: Some(bucket.to_string()),
        };

        match self.gateway.create_media_item(&item).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                // The row never landed, so the object would be unreachable
                if let Err(cleanup) = self.gateway.storage().delete(bucket, &uploaded.path).await {
                    warn!(
                        "Failed to remove orphaned object {}/{}: {}",
                        bucket, uploaded.path, cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Record a YouTube link as a video item. No file is transferred.
    pub async fn add_video_link(&self, url: &str) -> Result<MediaItem, GatewayError> {
        let video_id = youtube::resolve_video_id(url.trim()).ok_or_else(|| {
            GatewayError::Validation(format!("Not a valid YouTube link: {}", url.trim()))
        })?;

        let item = MediaItem {
            id: Uuid::new_v4().to_string(),
            media_type: MediaType::Video,
            name: youtube::link_name(&video_id),
            url: url.trim().to_string(),
            thumbnail: Some(youtube::thumbnail_url(&video_id)),
            size: None,
            upload_date: Utc::now(),
            is_youtube: true,
            youtube_id: Some(video_id),
            storage_path: None,
            storage_bucket: None,
        };

        self.gateway.create_media_item(&item).await
    }

    /// Store a speaker photo. Only images are accepted.
    pub async fn upload_speaker_photo(&self, file: UploadFile) -> Result<SpeakerPhoto, GatewayError> {
        if !file.content_type.starts_with("image/") {
            return Err(GatewayError::Validation(format!(
                "{} is not an image",
                file.name
            )));
        }

        let uploaded = self
            .gateway
            .store_file(
                Entity::Speaker,
                Bucket::Speakers,
                &file.name,
                file.data,
                &file.content_type,
            )
            .await?;

        Ok(SpeakerPhoto {
            url: uploaded.public_url,
            storage_path: uploaded.path,
            storage_bucket: Bucket::Speakers.to_string(),
        })
    }
}
