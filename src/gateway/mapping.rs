//! Static mapping between the in-memory camelCase records and table rows.

use crate::db::{
    DatabaseError, MediaItemChanges, MediaItemRow, SpeakerChanges, SpeakerRow, SurveyResponseRow,
};
use crate::models::{
    AiExperience, AiServices, MaterialUseful, MediaItem, MediaItemPatch, MediaType, MissingInfo,
    Obstacles, Recommendation, Speaker, SpeakerPatch, SurveyResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

impl From<&MediaItem> for MediaItemRow {
    fn from(item: &MediaItem) -> Self {
        MediaItemRow {
            id: item.id.clone(),
            name: item.name.clone(),
            media_type: item.media_type.as_str().to_string(),
            url: item.url.clone(),
            thumbnail: item.thumbnail.clone(),
            size: item.size,
            upload_date: item.upload_date,
            is_youtube: item.is_youtube,
            youtube_id: item.youtube_id.clone(),
            storage_path: item.storage_path.clone(),
            storage_bucket: item.storage_bucket.clone(),
        }
    }
}

impl TryFrom<MediaItemRow> for MediaItem {
    type Error = DatabaseError;

    fn try_from(row: MediaItemRow) -> Result<Self, Self::Error> {
        let media_type: MediaType = row
            .media_type
            .parse()
            .map_err(|e| DatabaseError::DeserializationError(format!("media_items.type: {e}")))?;

        Ok(MediaItem {
            id: row.id,
            media_type,
            name: row.name,
            url: row.url,
            thumbnail: row.thumbnail,
            size: row.size,
            upload_date: row.upload_date,
            is_youtube: row.is_youtube,
            youtube_id: row.youtube_id,
            storage_path: row.storage_path,
            storage_bucket: row.storage_bucket,
        })
    }
}

impl From<MediaItemPatch> for MediaItemChanges {
    fn from(patch: MediaItemPatch) -> Self {
        MediaItemChanges {
            name: patch.name,
            url: patch.url,
            thumbnail: patch.thumbnail,
            size: patch.size,
            storage_path: patch.storage_path,
            storage_bucket: patch.storage_bucket,
        }
    }
}

/// Row for a speaker whose id has already been validated
pub fn speaker_row(speaker: &Speaker, id: Uuid, created_at: DateTime<Utc>) -> SpeakerRow {
    SpeakerRow {
        id,
        name: speaker.name.clone(),
        role: speaker.role.clone(),
        bio: speaker.description.clone(),
        photo_url: speaker.photo_url.clone(),
        photo_storage_path: speaker.photo_storage_path.clone(),
        photo_storage_bucket: speaker.photo_storage_bucket.clone(),
        created_at,
    }
}

impl From<SpeakerRow> for Speaker {
    fn from(row: SpeakerRow) -> Self {
        Speaker {
            id: row.id.to_string(),
            name: row.name,
            description: row.bio,
            photo_url: row.photo_url,
            role: row.role,
            photo_storage_path: row.photo_storage_path,
            photo_storage_bucket: row.photo_storage_bucket,
        }
    }
}

impl From<SpeakerPatch> for SpeakerChanges {
    fn from(patch: SpeakerPatch) -> Self {
        SpeakerChanges {
            name: patch.name,
            role: patch.role,
            bio: patch.description,
            photo_url: patch.photo_url,
            photo_storage_path: patch.photo_storage_path,
            photo_storage_bucket: patch.photo_storage_bucket,
        }
    }
}

/// Shape of the `survey_responses.answers` JSON column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurveyAnswers {
    material_useful: MaterialUseful,
    recommendation: Recommendation,
    ai_experience: AiExperience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    missing_info: Option<MissingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ai_services: Option<AiServices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    obstacles: Option<Obstacles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<String>,
}

/// Pack the answer sub-fields into one JSON value
pub fn survey_row(response: &SurveyResponse, id: Uuid) -> Result<SurveyResponseRow, DatabaseError> {
    let answers = SurveyAnswers {
        material_useful: response.material_useful,
        recommendation: response.recommendation,
        ai_experience: response.ai_experience,
        company_name: response.company_name.clone(),
        missing_info: response.missing_info.clone(),
        ai_services: response.ai_services.clone(),
        obstacles: response.obstacles.clone(),
        comments: response.comments.clone(),
    };

    Ok(SurveyResponseRow {
        id,
        full_name: response.full_name.clone(),
        contacts: response.contacts.clone(),
        occupation: response.occupation.clone(),
        answers: serde_json::to_value(answers)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?,
        submitted_at: response.submitted_at,
    })
}

impl TryFrom<SurveyResponseRow> for SurveyResponse {
    type Error = DatabaseError;

    fn try_from(row: SurveyResponseRow) -> Result<Self, Self::Error> {
        let answers: SurveyAnswers = serde_json::from_value(row.answers).map_err(|e| {
            DatabaseError::DeserializationError(format!("survey_responses.answers: {e}"))
        })?;

        Ok(SurveyResponse {
            id: row.id.to_string(),
            full_name: row.full_name,
            contacts: row.contacts,
            occupation: row.occupation,
            material_useful: answers.material_useful,
            recommendation: answers.recommendation,
            ai_experience: answers.ai_experience,
            company_name: answers.company_name,
            missing_info: answers.missing_info,
            ai_services: answers.ai_services,
            obstacles: answers.obstacles,
            comments: answers.comments,
            submitted_at: row.submitted_at,
        })
    }
}
