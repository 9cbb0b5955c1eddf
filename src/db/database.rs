use crate::db::error::DatabaseError;
use crate::db::models::{
    MediaItemChanges, MediaItemRow, SpeakerChanges, SpeakerRow, SurveyResponseRow,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Database trait defining the row-level interface to the relational store
#[async_trait]
pub trait Database: Send + Sync + 'static {
    /// Insert a media item; fails with `Duplicate` if the id is taken
    async fn insert_media_item(&self, row: MediaItemRow) -> Result<MediaItemRow, DatabaseError>;

    async fn get_media_item(&self, id: &str) -> Result<Option<MediaItemRow>, DatabaseError>;

    /// All media items, newest upload first
    async fn list_media_items(&self) -> Result<Vec<MediaItemRow>, DatabaseError>;

    /// Apply `changes` and return the updated row, or `NotFound`
    async fn update_media_item(
        &self,
        id: &str,
        changes: MediaItemChanges,
    ) -> Result<MediaItemRow, DatabaseError>;

    /// Returns whether a row was removed
    async fn delete_media_item(&self, id: &str) -> Result<bool, DatabaseError>;

    async fn insert_speaker(&self, row: SpeakerRow) -> Result<SpeakerRow, DatabaseError>;

    async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>, DatabaseError>;

    /// All speakers ordered by name
    async fn list_speakers(&self) -> Result<Vec<SpeakerRow>, DatabaseError>;

    async fn update_speaker(
        &self,
        id: Uuid,
        changes: SpeakerChanges,
    ) -> Result<SpeakerRow, DatabaseError>;

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn insert_survey_response(
        &self,
        row: SurveyResponseRow,
    ) -> Result<SurveyResponseRow, DatabaseError>;

    /// All survey responses, newest submission first
    async fn list_survey_responses(&self) -> Result<Vec<SurveyResponseRow>, DatabaseError>;

    async fn delete_survey_response(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Implementation of Database trait for Arc<T> where T implements Database
#[async_trait]
impl<T: Database + ?Sized> Database for Arc<T> {
    async fn insert_media_item(&self, row: MediaItemRow) -> Result<MediaItemRow, DatabaseError> {
        (**self).insert_media_item(row).await
    }

    async fn get_media_item(&self, id: &str) -> Result<Option<MediaItemRow>, DatabaseError> {
        (**self).get_media_item(id).await
    }

    async fn list_media_items(&self) -> Result<Vec<MediaItemRow>, DatabaseError> {
        (**self).list_media_items().await
    }

    async fn update_media_item(
        &self,
        id: &str,
        changes: MediaItemChanges,
    ) -> Result<MediaItemRow, DatabaseError> {
        (**self).update_media_item(id, changes).await
    }

    async fn delete_media_item(&self, id: &str) -> Result<bool, DatabaseError> {
        (**self).delete_media_item(id).await
    }

    async fn insert_speaker(&self, row: SpeakerRow) -> Result<SpeakerRow, DatabaseError> {
        (**self).insert_speaker(row).await
    }

    async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>, DatabaseError> {
        (**self).get_speaker(id).await
    }

    async fn list_speakers(&self) -> Result<Vec<SpeakerRow>, DatabaseError> {
        (**self).list_speakers().await
    }

    async fn update_speaker(
        &self,
        id: Uuid,
        changes: SpeakerChanges,
    ) -> Result<SpeakerRow, DatabaseError> {
        (**self).update_speaker(id, changes).await
    }

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, DatabaseError> {
        (**self).delete_speaker(id).await
    }

    async fn insert_survey_response(
        &self,
        row: SurveyResponseRow,
    ) -> Result<SurveyResponseRow, DatabaseError> {
        (**self).insert_survey_response(row).await
    }

    async fn list_survey_responses(&self) -> Result<Vec<SurveyResponseRow>, DatabaseError> {
        (**self).list_survey_responses().await
    }

    async fn delete_survey_response(&self, id: Uuid) -> Result<bool, DatabaseError> {
        (**self).delete_survey_response(id).await
    }
}
