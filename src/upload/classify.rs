use crate::models::MediaType;
use bytes::Bytes;
use std::collections::BTreeMap;

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// MIME type as reported by the client
    pub content_type: String,
    pub data: Bytes,
}

/// Media category for a MIME type, falling back to `default` for anything unrecognized
pub fn classify(content_type: &str, default: MediaType) -> MediaType {
    if content_type.starts_with("image/") {
        MediaType::Photo
    } else if content_type.starts_with("video/") {
        MediaType::Video
    } else if content_type == "application/pdf" {
        MediaType::Presentation
    } else {
        default
    }
}

/// Group files by category. Empty categories are absent from the map.
pub fn partition(files: Vec<UploadFile>, default: MediaType) -> BTreeMap<MediaType, Vec<UploadFile>> {
    let mut partitions: BTreeMap<MediaType, Vec<UploadFile>> = BTreeMap::new();
    for file in files {
        partitions
            .entry(classify(&file.content_type, default))
            .or_default()
            .push(file);
    }
    partitions
}
