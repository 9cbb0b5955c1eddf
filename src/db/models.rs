use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// The three tables of the relational store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    MediaItems,
    Speakers,
    SurveyResponses,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::MediaItems => "media_items",
            Table::Speakers => "speakers",
            Table::SurveyResponses => "survey_responses",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a row in the media_items table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItemRow {
    pub id: String,
    pub name: String,
    /// `photo`, `video` or `presentation`
    pub media_type: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub size: Option<i64>,
    pub upload_date: DateTime<Utc>,
    pub is_youtube: bool,
    pub youtube_id: Option<String>,
    pub storage_path: Option<String>,
    pub storage_bucket: Option<String>,
}

/// Column updates for a media_items row; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaItemChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub size: Option<i64>,
    pub storage_path: Option<String>,
    pub storage_bucket: Option<String>,
}

/// Represents a row in the speakers table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_url: String,
    pub photo_storage_path: Option<String>,
    pub photo_storage_bucket: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerChanges {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub photo_storage_path: Option<String>,
    pub photo_storage_bucket: Option<String>,
}

/// Represents a row in the survey_responses table.
///
/// Every optional answer lives inside the `answers` JSON column.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponseRow {
    pub id: Uuid,
    pub full_name: String,
    pub contacts: String,
    pub occupation: String,
    pub answers: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}
