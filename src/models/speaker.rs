use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conference speaker profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    /// Canonical UUID once persisted; empty or non-UUID marks a new, unsaved speaker
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Body in the markup syntax understood by [`crate::markup::render`]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_storage_bucket: Option<String>,
}

impl Speaker {
    /// Returns the id as a UUID when it is already in canonical form
    pub fn uuid(&self) -> Option<Uuid> {
        parse_canonical_uuid(&self.id)
    }

    pub fn photo_location(&self) -> Option<(&str, &str)> {
        match (
            self.photo_storage_path.as_deref(),
            self.photo_storage_bucket.as_deref(),
        ) {
            (Some(path), Some(bucket)) if !path.is_empty() && !bucket.is_empty() => {
                Some((path, bucket))
            }
            _ => None,
        }
    }
}

/// Partial update of a speaker; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<String>,
    pub photo_storage_path: Option<String>,
    pub photo_storage_bucket: Option<String>,
}

impl SpeakerPatch {
    /// Patch that rewrites every field of `speaker`
    pub fn replace_with(speaker: &Speaker) -> Self {
        Self {
            name: Some(speaker.name.clone()),
            description: Some(speaker.description.clone()),
            photo_url: Some(speaker.photo_url.clone()),
            role: Some(speaker.role.clone()),
            photo_storage_path: speaker.photo_storage_path.clone(),
            photo_storage_bucket: speaker.photo_storage_bucket.clone(),
        }
    }
}

/// Parses `s` as a hyphenated UUID, the only form accepted as a persisted id
pub fn parse_canonical_uuid(s: &str) -> Option<Uuid> {
    if s.len() != 36 {
        return None;
    }
    Uuid::parse_str(s).ok()
}
