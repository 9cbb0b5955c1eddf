use crate::config::{load_config, Config};
use crate::models::{
    AiExperience, MaterialUseful, MediaItem, MediaType, Recommendation, Speaker, SurveyResponse,
};
use crate::upload::UploadFile;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

/// Check if a test is enabled via environment variable
fn is_test_enabled(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Check if database tests are enabled via environment variable
pub fn is_db_enabled() -> bool {
    is_test_enabled("ENABLE_DB_TESTS")
}

/// Check if S3 tests are enabled via environment variable
pub fn is_s3_enabled() -> bool {
    is_test_enabled("ENABLE_S3_TESTS")
}

/// Load test configuration from config.toml
pub fn load_test_config() -> Result<Config, anyhow::Error> {
    let config_path = "config.toml";

    load_config(config_path).map_err(|e| anyhow::anyhow!("Failed to load config.toml: {}", e))
}

/// Creates a media item that lives in the object store
pub fn sample_media_item(name: &str, media_type: MediaType) -> MediaItem {
    let bucket = media_type.bucket();
    let path = format!("{}-{}", Utc::now().timestamp_millis(), name);
    MediaItem {
        id: Uuid::new_v4().to_string(),
        media_type,
        name: name.to_string(),
        url: format!("https://storage.test/{}/{}", bucket, path),
        thumbnail: None,
        size: Some(1024),
        upload_date: Utc::now(),
        is_youtube: false,
        youtube_id: None,
        storage_path: Some(path),
        storage_bucket: Some(bucket.to_string()),
    }
}

/// Creates a media item that only carries a legacy link
pub fn sample_legacy_media_item(id: &str, name: &str, media_type: MediaType) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        media_type,
        name: name.to_string(),
        url: format!("https://legacy.test/files/{}", name),
        thumbnail: None,
        size: None,
        upload_date: Utc::now(),
        is_youtube: false,
        youtube_id: None,
        storage_path: None,
        storage_bucket: None,
    }
}

pub fn sample_speaker(name: &str) -> Speaker {
    Speaker {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: format!("## {}\n- Speaker", name),
        photo_url: String::new(),
        role: "Director".to_string(),
        photo_storage_path: None,
        photo_storage_bucket: None,
    }
}

pub fn sample_survey_response(full_name: &str) -> SurveyResponse {
    SurveyResponse {
        id: Uuid::new_v4().to_string(),
        full_name: full_name.to_string(),
        contacts: "ivan@example.com".to_string(),
        occupation: "Producer".to_string(),
        material_useful: MaterialUseful::Yes,
        recommendation: Recommendation::Definitely,
        ai_experience: AiExperience::Reading,
        company_name: None,
        missing_info: None,
        ai_services: None,
        obstacles: None,
        comments: Some("Great talks".to_string()),
        submitted_at: Utc::now(),
    }
}

pub fn upload_file(name: &str, content_type: &str) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::from(format!("contents of {}", name)),
    }
}
