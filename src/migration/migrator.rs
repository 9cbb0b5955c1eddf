use crate::db::Database;
use crate::gateway::{Entity, Gateway, GatewayError};
use crate::local::LegacySnapshot;
use crate::migration::fetch::FileSource;
use crate::models::{
    parse_canonical_uuid, MediaItem, MediaItemPatch, MediaSource, MediaType, Speaker, SpeakerPatch,
    SurveyResponse,
};
use crate::s3::{Bucket, Storage};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-collection migration counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    /// Files copied into the object store
    pub uploaded: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Already migrated, nothing to do
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl CollectionReport {
    fn fail(&mut self, message: String) {
        warn!("Migration: {message}");
        self.failed += 1;
        self.errors.push(message);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub media: CollectionReport,
    pub speakers: CollectionReport,
    pub survey_responses: CollectionReport,
}

impl MigrationReport {
    pub fn uploaded(&self) -> usize {
        self.media.uploaded + self.speakers.uploaded + self.survey_responses.uploaded
    }

    pub fn failed(&self) -> usize {
        self.media.failed + self.speakers.failed + self.survey_responses.failed
    }
}

/// Copies legacy locally persisted records and files into the remote stores.
///
/// Records that already carry storage markers and exist remotely are left
/// alone, so running it again after a successful run does nothing.
pub struct Migrator<D, S, F> {
    gateway: Arc<Gateway<D, S>>,
    files: F,
}

impl<D: Database, S: Storage, F: FileSource> Migrator<D, S, F> {
    pub fn new(gateway: Arc<Gateway<D, S>>, files: F) -> Self {
        Self { gateway, files }
    }

    /// Migrate everything in `snapshot`, writing new ids and markers back into it.
    ///
    /// The caller persists the snapshot afterwards.
    pub async fn run(&self, snapshot: &mut LegacySnapshot) -> MigrationReport {
        info!("Starting legacy migration");
        let report = MigrationReport {
            media: self.migrate_media(&mut snapshot.media).await,
            speakers: self.migrate_speakers(&mut snapshot.speakers).await,
            survey_responses: self
                .migrate_survey_responses(&mut snapshot.survey_responses)
                .await,
        };
        info!(
            "Legacy migration finished: {} files uploaded, {} failures",
            report.uploaded(),
            report.failed()
        );
        report
    }

    async fn migrate_media(&self, items: &mut [MediaItem]) -> CollectionReport {
        let mut report = CollectionReport::default();
        let remote_ids: HashSet<String> = match self.gateway.fetch_media_items().await {
            Ok(remote) => remote.into_iter().map(|item| item.id).collect(),
            Err(e) => {
                abandon(&mut report, items.len(), "media items", &e);
                return report;
            }
        };

        for item in items.iter_mut() {
            let exists = remote_ids.contains(&item.id);
            let mut moved = false;

            if item.source() == MediaSource::External {
                match self.copy_media_file(item).await {
                    Ok(()) => {
                        report.uploaded += 1;
                        moved = true;
                    }
                    Err(message) => {
                        report.fail(message);
                        continue;
                    }
                }
            }

            if !exists {
                match self.gateway.create_media_item(item).await {
                    Ok(_) => report.inserted += 1,
                    Err(e) => report.fail(format!("media item {}: {}", item.id, e)),
                }
            } else if moved {
                let patch = MediaItemPatch {
                    url: Some(item.url.clone()),
                    thumbnail: item.thumbnail.clone(),
                    storage_path: item.storage_path.clone(),
                    storage_bucket: item.storage_bucket.clone(),
                    ..Default::default()
                };
                match self.gateway.update_media_item(&item.id, patch).await {
                    Ok(_) => report.updated += 1,
                    Err(e) => report.fail(format!("media item {}: {}", item.id, e)),
                }
            } else {
                debug!("Media item {} already migrated", item.id);
                report.skipped += 1;
            }
        }
        report
    }

    /// Download the file behind a legacy link and store it; updates `item` on success
    async fn copy_media_file(&self, item: &mut MediaItem) -> Result<(), String> {
        let file = self
            .files
            .fetch(&item.url)
            .await
            .map_err(|e| format!("media item {}: could not fetch {}: {}", item.id, item.url, e))?;

        let bucket = item.media_type.bucket();
        let uploaded = self
            .gateway
            .store_file(
                Entity::MediaItem,
                bucket,
                &item.name,
                file.data,
                &file.content_type,
            )
            .await
            .map_err(|e| format!("media item {}: {}", item.id, e))?;

        if item.media_type == MediaType::Photo {
            item.thumbnail = Some(uploaded.public_url.clone());
        }
        item.url = uploaded.public_url;
        item.storage_path = Some(uploaded.path);
        item.storage_bucket = Some(bucket.to_string());
        Ok(())
    }

    async fn migrate_speakers(&self, speakers: &mut [Speaker]) -> CollectionReport {
        let mut report = CollectionReport::default();
        let remote_ids: HashSet<String> = match self.gateway.fetch_speakers().await {
            Ok(remote) => remote.into_iter().map(|speaker| speaker.id).collect(),
            Err(e) => {
                abandon(&mut report, speakers.len(), "speakers", &e);
                return report;
            }
        };

        for speaker in speakers.iter_mut() {
            if parse_canonical_uuid(&speaker.id).is_none() {
                let id = Uuid::new_v4().to_string();
                debug!("Legacy speaker {} gets id {}", speaker.id, id);
                speaker.id = id;
            }
            let exists = remote_ids.contains(&speaker.id);
            let mut moved = false;

            if speaker.photo_location().is_none() && !speaker.photo_url.is_empty() {
                match self.copy_speaker_photo(speaker).await {
                    Ok(()) => {
                        report.uploaded += 1;
                        moved = true;
                    }
                    Err(message) => {
                        report.fail(message);
                        continue;
                    }
                }
            }

            if !exists {
                match self.gateway.create_speaker(speaker).await {
                    Ok(_) => report.inserted += 1,
                    Err(e) => report.fail(format!("speaker {}: {}", speaker.id, e)),
                }
            } else if moved {
                let patch = SpeakerPatch {
                    photo_url: Some(speaker.photo_url.clone()),
                    photo_storage_path: speaker.photo_storage_path.clone(),
                    photo_storage_bucket: speaker.photo_storage_bucket.clone(),
                    ..Default::default()
                };
                match self.gateway.update_speaker(&speaker.id, patch).await {
                    Ok(_) => report.updated += 1,
                    Err(e) => report.fail(format!("speaker {}: {}", speaker.id, e)),
                }
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    async fn copy_speaker_photo(&self, speaker: &mut Speaker) -> Result<(), String> {
        let file = self.files.fetch(&speaker.photo_url).await.map_err(|e| {
            format!(
                "speaker {}: could not fetch {}: {}",
                speaker.id, speaker.photo_url, e
            )
        })?;

        let uploaded = self
            .gateway
            .store_file(
                Entity::Speaker,
                Bucket::Speakers,
                &format!("speaker-{}.jpg", speaker.id),
                file.data,
                &file.content_type,
            )
            .await
            .map_err(|e| format!("speaker {}: {}", speaker.id, e))?;

        speaker.photo_url = uploaded.public_url;
        speaker.photo_storage_path = Some(uploaded.path);
        speaker.photo_storage_bucket = Some(Bucket::Speakers.to_string());
        Ok(())
    }

    async fn migrate_survey_responses(
        &self,
        responses: &mut [SurveyResponse],
    ) -> CollectionReport {
        let mut report = CollectionReport::default();
        let remote_ids: HashSet<String> = match self.gateway.fetch_survey_responses().await {
            Ok(remote) => remote.into_iter().map(|response| response.id).collect(),
            Err(e) => {
                abandon(&mut report, responses.len(), "survey responses", &e);
                return report;
            }
        };

        for response in responses.iter_mut() {
            if parse_canonical_uuid(&response.id).is_none() {
                response.id = Uuid::new_v4().to_string();
            }
            if remote_ids.contains(&response.id) {
                report.skipped += 1;
                continue;
            }
            match self.gateway.create_survey_response(response).await {
                Ok(_) => report.inserted += 1,
                Err(e) => report.fail(format!("survey response {}: {}", response.id, e)),
            }
        }
        report
    }
}

/// Without the remote ids nothing in the collection can be migrated safely
fn abandon(report: &mut CollectionReport, count: usize, label: &str, error: &GatewayError) {
    warn!("Skipping {label} migration: {error}");
    report.failed += count;
    report
        .errors
        .push(format!("could not list remote {label}: {error}"));
}
