use super::mapping::speaker_row;
use super::{Entity, Gateway, GatewayError};
use crate::db::{Database, DatabaseError};
use crate::models::{parse_canonical_uuid, Speaker, SpeakerPatch};
use crate::s3::Storage;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

fn require_uuid(id: &str) -> Result<Uuid, GatewayError> {
    parse_canonical_uuid(id)
        .ok_or_else(|| GatewayError::Validation(format!("Speaker id '{id}' is not a UUID")))
}

/// A UUID not present in `existing`
fn fresh_id(existing: &[String]) -> Uuid {
    let taken: HashSet<&str> = existing.iter().map(String::as_str).collect();
    loop {
        let id = Uuid::new_v4();
        if !taken.contains(id.to_string().as_str()) {
            return id;
        }
    }
}

impl<D: Database, S: Storage> Gateway<D, S> {
    /// Insert a speaker whose id is already a canonical UUID
    pub async fn create_speaker(&self, speaker: &Speaker) -> Result<Speaker, GatewayError> {
        let id = require_uuid(&speaker.id)?;
        if speaker.name.trim().is_empty() {
            return Err(GatewayError::Validation(
                "Speaker name is required".to_string(),
            ));
        }

        let saved = self
            .db
            .insert_speaker(speaker_row(speaker, id, Utc::now()))
            .await
            .map_err(|e| GatewayError::transport(Entity::Speaker, "create", Some(&speaker.id), e))?;

        info!("Created speaker {}", saved.id);
        Ok(saved.into())
    }

    /// Save from the admin form.
    ///
    /// A speaker without a canonical UUID is new and gets a fresh id distinct
    /// from `existing_ids`. Otherwise the stored record is replaced in full.
    pub async fn save_speaker(
        &self,
        speaker: &Speaker,
        existing_ids: &[String],
    ) -> Result<Speaker, GatewayError> {
        let Some(id) = speaker.uuid() else {
            let mut new_speaker = speaker.clone();
            new_speaker.id = fresh_id(existing_ids).to_string();
            debug!("Assigned id {} to new speaker", new_speaker.id);
            return self.create_speaker(&new_speaker).await;
        };

        match self
            .db
            .update_speaker(id, SpeakerPatch::replace_with(speaker).into())
            .await
        {
            Ok(row) => Ok(row.into()),
            Err(DatabaseError::NotFound(_)) => {
                debug!("Speaker {} not stored yet, creating it", id);
                self.create_speaker(speaker).await
            }
            Err(e) => Err(GatewayError::transport(
                Entity::Speaker,
                "update",
                Some(&speaker.id),
                e,
            )),
        }
    }

    /// All speakers ordered by name
    pub async fn fetch_speakers(&self) -> Result<Vec<Speaker>, GatewayError> {
        let rows = self
            .db
            .list_speakers()
            .await
            .map_err(|e| GatewayError::transport(Entity::Speaker, "fetch", None, e))?;

        debug!("Fetched {} speakers", rows.len());
        Ok(rows.into_iter().map(Speaker::from).collect())
    }

    pub async fn update_speaker(
        &self,
        id: &str,
        patch: SpeakerPatch,
    ) -> Result<Speaker, GatewayError> {
        let uuid = require_uuid(id)?;
        let row = self
            .db
            .update_speaker(uuid, patch.into())
            .await
            .map_err(|e| GatewayError::transport(Entity::Speaker, "update", Some(id), e))?;

        Ok(row.into())
    }

    /// Delete a speaker. Removing the photo is best-effort and never blocks the delete.
    pub async fn delete_speaker(&self, id: &str) -> Result<bool, GatewayError> {
        let uuid = require_uuid(id)?;
        let row = self
            .db
            .get_speaker(uuid)
            .await
            .map_err(|e| GatewayError::transport(Entity::Speaker, "delete", Some(id), e))?;

        let Some(row) = row else {
            debug!("Speaker {} is already gone", id);
            return Ok(false);
        };

        let speaker = Speaker::from(row);
        if let Some((path, bucket)) = speaker.photo_location() {
            if let Err(e) = self.remove_file(Entity::Speaker, bucket, path).await {
                warn!("Keeping orphaned photo of speaker {}: {}", id, e);
            }
        }

        let removed = self
            .db
            .delete_speaker(uuid)
            .await
            .map_err(|e| GatewayError::transport(Entity::Speaker, "delete", Some(id), e))?;

        info!("Deleted speaker {}", id);
        Ok(removed)
    }
}
