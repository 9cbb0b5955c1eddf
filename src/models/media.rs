use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::s3::Bucket;

/// Category of an uploaded or linked asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
    Presentation,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Photo, MediaType::Video, MediaType::Presentation];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
            MediaType::Presentation => "presentation",
        }
    }

    /// The logical bucket files of this category are stored in
    pub fn bucket(&self) -> Bucket {
        match self {
            MediaType::Photo => Bucket::Photos,
            MediaType::Video => Bucket::Videos,
            MediaType::Presentation => Bucket::Presentations,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(MediaType::Photo),
            "video" => Ok(MediaType::Video),
            "presentation" => Ok(MediaType::Presentation),
            other => Err(format!("Unknown media type: {other}")),
        }
    }
}

/// One uploaded or linked asset.
///
/// Serialized in the camelCase shape used by the legacy local snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    pub upload_date: DateTime<Utc>,
    #[serde(rename = "isYouTube", default)]
    pub is_youtube: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
}

/// Where the bytes behind a media item live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource<'a> {
    /// Externally hosted video, nothing in the object store
    YouTube { video_id: &'a str },
    /// File held in the object store
    Stored { path: &'a str, bucket: &'a str },
    /// Legacy link that has not been migrated yet
    External,
}

impl MediaItem {
    pub fn source(&self) -> MediaSource<'_> {
        if self.is_youtube {
            if let Some(video_id) = self.youtube_id.as_deref() {
                return MediaSource::YouTube { video_id };
            }
        }
        match (self.storage_path.as_deref(), self.storage_bucket.as_deref()) {
            (Some(path), Some(bucket)) if !path.is_empty() && !bucket.is_empty() => {
                MediaSource::Stored { path, bucket }
            }
            _ => MediaSource::External,
        }
    }

    /// Rejects items that mix a YouTube link with a stored file, or that
    /// carry only half of a storage location
    pub fn check_source(&self) -> Result<(), String> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        let has_path = present(&self.storage_path);
        let has_bucket = present(&self.storage_bucket);
        let has_video_id = present(&self.youtube_id);

        if self.is_youtube {
            if !has_video_id {
                return Err("YouTube media needs a video id".to_string());
            }
            if has_path || has_bucket {
                return Err("YouTube media cannot reference a stored file".to_string());
            }
        } else {
            if has_video_id {
                return Err("Only YouTube media carries a video id".to_string());
            }
            if has_path != has_bucket {
                return Err("Storage path and bucket must be set together".to_string());
            }
        }
        Ok(())
    }

    /// True once the item no longer depends on a legacy link
    pub fn has_remote_markers(&self) -> bool {
        !matches!(self.source(), MediaSource::External)
    }
}

/// Partial update of a media item; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaItemPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub size: Option<i64>,
    pub storage_path: Option<String>,
    pub storage_bucket: Option<String>,
}

impl MediaItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, item: &mut MediaItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(url) = &self.url {
            item.url = url.clone();
        }
        if let Some(thumbnail) = &self.thumbnail {
            item.thumbnail = Some(thumbnail.clone());
        }
        if let Some(size) = self.size {
            item.size = Some(size);
        }
        if let Some(path) = &self.storage_path {
            item.storage_path = Some(path.clone());
        }
        if let Some(bucket) = &self.storage_bucket {
            item.storage_bucket = Some(bucket.clone());
        }
    }
}

/// Item counts per media type, shown on the admin overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaStats {
    pub photo: usize,
    pub video: usize,
    pub presentation: usize,
}

impl MediaStats {
    pub fn from_items(items: &[MediaItem]) -> Self {
        items.iter().fold(Self::default(), |mut stats, item| {
            match item.media_type {
                MediaType::Photo => stats.photo += 1,
                MediaType::Video => stats.video += 1,
                MediaType::Presentation => stats.presentation += 1,
            }
            stats
        })
    }
}
