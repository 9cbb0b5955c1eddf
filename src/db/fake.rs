use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{
    MediaItemChanges, MediaItemRow, SpeakerChanges, SpeakerRow, SurveyResponseRow, Table,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

/// A fake in-memory implementation of the Database trait for testing
#[derive(Clone)]
pub struct FakeDatabase {
    media: Arc<RwLock<HashMap<String, MediaItemRow>>>,
    speakers: Arc<RwLock<HashMap<Uuid, SpeakerRow>>>,
    survey: Arc<RwLock<HashMap<Uuid, SurveyResponseRow>>>,
    failing_tables: Arc<RwLock<HashSet<Table>>>,
    failing_media_names: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<HashMap<Table, usize>>>,
    latency: Arc<RwLock<Option<Duration>>>,
}

impl FakeDatabase {
    /// Create a new empty FakeDatabase
    pub fn new() -> Self {
        FakeDatabase {
            media: Arc::new(RwLock::new(HashMap::new())),
            speakers: Arc::new(RwLock::new(HashMap::new())),
            survey: Arc::new(RwLock::new(HashMap::new())),
            failing_tables: Arc::new(RwLock::new(HashSet::new())),
            failing_media_names: Arc::new(RwLock::new(HashSet::new())),
            calls: Arc::new(RwLock::new(HashMap::new())),
            latency: Arc::new(RwLock::new(None)),
        }
    }

    /// Make every operation on `table` fail until restored
    pub fn fake_fail_table(&self, table: Table) {
        self.failing_tables.write().unwrap().insert(table);
    }

    pub fn fake_restore_table(&self, table: Table) {
        self.failing_tables.write().unwrap().remove(&table);
    }

    /// Make inserting a media item with this name fail
    pub fn fake_fail_media_insert_named(&self, name: &str) {
        self.failing_media_names
            .write()
            .unwrap()
            .insert(name.to_string());
    }

    /// Delay every call by `latency`
    pub fn fake_set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap() = Some(latency);
    }

    /// Number of calls made against `table`, failed ones included
    pub fn call_count(&self, table: Table) -> usize {
        self.calls.read().unwrap().get(&table).copied().unwrap_or(0)
    }

    pub fn speaker_ids(&self) -> Vec<Uuid> {
        self.speakers.read().unwrap().keys().copied().collect()
    }

    async fn enter(&self, table: Table) -> Result<(), DatabaseError> {
        *self.calls.write().unwrap().entry(table).or_insert(0) += 1;

        let latency = *self.latency.read().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_tables.read().unwrap().contains(&table) {
            return Err(DatabaseError::QueryError(format!(
                "simulated failure on {}",
                table
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn insert_media_item(&self, row: MediaItemRow) -> Result<MediaItemRow, DatabaseError> {
        self.enter(Table::MediaItems).await?;
        if self.failing_media_names.read().unwrap().contains(&row.name) {
            return Err(DatabaseError::QueryError(format!(
                "simulated insert failure for {}",
                row.name
            )));
        }

        let mut media = self.media.write().unwrap();
        if media.contains_key(&row.id) {
            return Err(DatabaseError::Duplicate(row.id));
        }
        media.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn get_media_item(&self, id: &str) -> Result<Option<MediaItemRow>, DatabaseError> {
        self.enter(Table::MediaItems).await?;
        Ok(self.media.read().unwrap().get(id).cloned())
    }

    async fn list_media_items(&self) -> Result<Vec<MediaItemRow>, DatabaseError> {
        self.enter(Table::MediaItems).await?;
        let mut rows: Vec<MediaItemRow> = self.media.read().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(rows)
    }

    async fn update_media_item(
        &self,
        id: &str,
        changes: MediaItemChanges,
    ) -> Result<MediaItemRow, DatabaseError> {
        self.enter(Table::MediaItems).await?;
        let mut media = self.media.write().unwrap();
        let row = media
            .get_mut(id)
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(url) = changes.url {
            row.url = url;
        }
        if let Some(thumbnail) = changes.thumbnail {
            row.thumbnail = Some(thumbnail);
        }
        if let Some(size) = changes.size {
            row.size = Some(size);
        }
        if let Some(path) = changes.storage_path {
            row.storage_path = Some(path);
        }
        if let Some(bucket) = changes.storage_bucket {
            row.storage_bucket = Some(bucket);
        }
        Ok(row.clone())
    }

    async fn delete_media_item(&self, id: &str) -> Result<bool, DatabaseError> {
        self.enter(Table::MediaItems).await?;
        Ok(self.media.write().unwrap().remove(id).is_some())
    }

    async fn insert_speaker(&self, row: SpeakerRow) -> Result<SpeakerRow, DatabaseError> {
        self.enter(Table::Speakers).await?;
        let mut speakers = self.speakers.write().unwrap();
        if speakers.contains_key(&row.id) {
            return Err(DatabaseError::Duplicate(row.id.to_string()));
        }
        speakers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>, DatabaseError> {
        self.enter(Table::Speakers).await?;
        Ok(self.speakers.read().unwrap().get(&id).cloned())
    }

    async fn list_speakers(&self) -> Result<Vec<SpeakerRow>, DatabaseError> {
        self.enter(Table::Speakers).await?;
        let mut rows: Vec<SpeakerRow> = self.speakers.read().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_speaker(
        &self,
        id: Uuid,
        changes: SpeakerChanges,
    ) -> Result<SpeakerRow, DatabaseError> {
        self.enter(Table::Speakers).await?;
        let mut speakers = self.speakers.write().unwrap();
        let row = speakers
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(role) = changes.role {
            row.role = role;
        }
        if let Some(bio) = changes.bio {
            row.bio = bio;
        }
        if let Some(photo_url) = changes.photo_url {
            row.photo_url = photo_url;
        }
        if let Some(path) = changes.photo_storage_path {
            row.photo_storage_path = Some(path);
        }
        if let Some(bucket) = changes.photo_storage_bucket {
            row.photo_storage_bucket = Some(bucket);
        }
        Ok(row.clone())
    }

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.enter(Table::Speakers).await?;
        Ok(self.speakers.write().unwrap().remove(&id).is_some())
    }

    async fn insert_survey_response(
        &self,
        row: SurveyResponseRow,
    ) -> Result<SurveyResponseRow, DatabaseError> {
        self.enter(Table::SurveyResponses).await?;
        let mut survey = self.survey.write().unwrap();
        if survey.contains_key(&row.id) {
            return Err(DatabaseError::Duplicate(row.id.to_string()));
        }
        survey.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_survey_responses(&self) -> Result<Vec<SurveyResponseRow>, DatabaseError> {
        self.enter(Table::SurveyResponses).await?;
        let mut rows: Vec<SurveyResponseRow> =
            self.survey.read().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }

    async fn delete_survey_response(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.enter(Table::SurveyResponses).await?;
        Ok(self.survey.write().unwrap().remove(&id).is_some())
    }
}

impl Default for FakeDatabase {
    fn default() -> Self {
        Self::new()
    }
}
