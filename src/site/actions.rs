use super::Site;
use crate::db::Database;
use crate::gateway::GatewayError;
use crate::local::LocalStore;
use crate::models::{MediaItem, MediaType, Speaker, SurveyResponse};
use crate::s3::Storage;
use crate::upload::{BatchOutcome, SpeakerPhoto, UploadFile};
use tokio::sync::watch;
use tracing::warn;

impl<D: Database, S: Storage, L: LocalStore> Site<D, S, L> {
    pub async fn upload_media(
        &self,
        files: Vec<UploadFile>,
        default: MediaType,
        progress: &watch::Sender<u8>,
    ) -> BatchOutcome {
        let outcome = self.uploader.upload_batch(files, default, progress).await;
        if !outcome.items.is_empty() {
            self.view.write().await.add_media(outcome.items.iter().cloned());
        }
        outcome
    }

    pub async fn add_video_link(&self, url: &str) -> Result<MediaItem, GatewayError> {
        let item = self.uploader.add_video_link(url).await?;
        self.view.write().await.add_media([item.clone()]);
        Ok(item)
    }

    pub async fn delete_media(&self, id: &str) -> Result<bool, GatewayError> {
        let result = self.gateway.delete_media_item(id).await;
        if let Err(e) = &result {
            warn!("Removing media item {id} from the view despite failed delete: {e}");
        }
        self.view.write().await.remove_media(id);
        result
    }

    /// Save a speaker from the admin form and show the stored version
    pub async fn save_speaker(&self, speaker: &Speaker) -> Result<Speaker, GatewayError> {
        let existing_ids: Vec<String> = {
            let view = self.view.read().await;
            view.speakers.items.iter().map(|s| s.id.clone()).collect()
        };
        let saved = self.gateway.save_speaker(speaker, &existing_ids).await?;

        let mut view = self.view.write().await;
        if saved.id != speaker.id {
            // A speaker that only existed locally now has its persisted id
            view.remove_speaker(&speaker.id);
        }
        view.upsert_speaker(saved.clone());
        Ok(saved)
    }

    pub async fn upload_speaker_photo(&self, file: UploadFile) -> Result<SpeakerPhoto, GatewayError> {
        self.uploader.upload_speaker_photo(file).await
    }

    pub async fn delete_speaker(&self, id: &str) -> Result<bool, GatewayError> {
        let result = self.gateway.delete_speaker(id).await;
        if let Err(e) = &result {
            warn!("Removing speaker {id} from the view despite failed delete: {e}");
        }
        self.view.write().await.remove_speaker(id);
        result
    }

    pub async fn submit_survey(
        &self,
        response: &SurveyResponse,
    ) -> Result<SurveyResponse, GatewayError> {
        let saved = self.gateway.submit_survey_response(response).await?;
        self.view.write().await.add_survey_response(saved.clone());
        Ok(saved)
    }

    pub async fn delete_survey_response(&self, id: &str) -> Result<bool, GatewayError> {
        let result = self.gateway.delete_survey_response(id).await;
        if let Err(e) = &result {
            warn!("Removing survey response {id} from the view despite failed delete: {e}");
        }
        self.view.write().await.remove_survey_response(id);
        result
    }
}
