use crate::db::error::DatabaseError;
use crate::db::models::{MediaItemRow, SpeakerRow, SurveyResponseRow, Table};
use sqlx::postgres::PgRow;
use sqlx::Row as _;

/// Helper macro to extract a field from a database row with error handling
macro_rules! pg_get_field {
    ($row:expr, $field:expr) => {
        $row.try_get($field)
            .map_err(|e| DatabaseError::DeserializationError(format!("{}: {}", $field, e)))?
    };
}

pub const MEDIA_ITEM_COLUMNS: &str = "id, name, type, url, thumbnail, size, upload_date, \
     is_youtube, youtube_id, storage_path, storage_bucket";

pub const SPEAKER_COLUMNS: &str = "id, name, role, bio, photo_url, photo_storage_path, \
     photo_storage_bucket, created_at";

pub const SURVEY_RESPONSE_COLUMNS: &str =
    "id, full_name, contacts, occupation, answers, submitted_at";

/// Column definitions for each table
pub fn table_definition(table: Table) -> &'static str {
    match table {
        Table::MediaItems => {
            r#"
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('photo', 'video', 'presentation')),
            url TEXT NOT NULL,
            thumbnail TEXT,
            size BIGINT,
            upload_date TIMESTAMPTZ NOT NULL DEFAULT now(),
            is_youtube BOOLEAN NOT NULL DEFAULT FALSE,
            youtube_id TEXT,
            storage_path TEXT,
            storage_bucket TEXT
            "#
        }
        Table::Speakers => {
            r#"
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT '',
            bio TEXT NOT NULL DEFAULT '',
            photo_url TEXT NOT NULL DEFAULT '',
            photo_storage_path TEXT,
            photo_storage_bucket TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            "#
        }
        Table::SurveyResponses => {
            r#"
            id UUID PRIMARY KEY,
            full_name TEXT NOT NULL,
            contacts TEXT NOT NULL,
            occupation TEXT NOT NULL,
            answers JSONB NOT NULL DEFAULT '{}'::jsonb,
            submitted_at TIMESTAMPTZ NOT NULL DEFAULT now()
            "#
        }
    }
}

/// Columns added after the first deployment, applied with ADD COLUMN IF NOT EXISTS
pub fn added_columns(table: Table) -> &'static [(&'static str, &'static str)] {
    match table {
        Table::MediaItems => &[("storage_path", "TEXT"), ("storage_bucket", "TEXT")],
        Table::Speakers => &[
            ("photo_storage_path", "TEXT"),
            ("photo_storage_bucket", "TEXT"),
        ],
        Table::SurveyResponses => &[],
    }
}

pub fn media_item_from_row(row: &PgRow) -> Result<MediaItemRow, DatabaseError> {
    Ok(MediaItemRow {
        id: pg_get_field!(row, "id"),
        name: pg_get_field!(row, "name"),
        media_type: pg_get_field!(row, "type"),
        url: pg_get_field!(row, "url"),
        thumbnail: pg_get_field!(row, "thumbnail"),
        size: pg_get_field!(row, "size"),
        upload_date: pg_get_field!(row, "upload_date"),
        is_youtube: pg_get_field!(row, "is_youtube"),
        youtube_id: pg_get_field!(row, "youtube_id"),
        storage_path: pg_get_field!(row, "storage_path"),
        storage_bucket: pg_get_field!(row, "storage_bucket"),
    })
}

pub fn speaker_from_row(row: &PgRow) -> Result<SpeakerRow, DatabaseError> {
    Ok(SpeakerRow {
        id: pg_get_field!(row, "id"),
        name: pg_get_field!(row, "name"),
        role: pg_get_field!(row, "role"),
        bio: pg_get_field!(row, "bio"),
        photo_url: pg_get_field!(row, "photo_url"),
        photo_storage_path: pg_get_field!(row, "photo_storage_path"),
        photo_storage_bucket: pg_get_field!(row, "photo_storage_bucket"),
        created_at: pg_get_field!(row, "created_at"),
    })
}

pub fn survey_response_from_row(row: &PgRow) -> Result<SurveyResponseRow, DatabaseError> {
    Ok(SurveyResponseRow {
        id: pg_get_field!(row, "id"),
        full_name: pg_get_field!(row, "full_name"),
        contacts: pg_get_field!(row, "contacts"),
        occupation: pg_get_field!(row, "occupation"),
        answers: pg_get_field!(row, "answers"),
        submitted_at: pg_get_field!(row, "submitted_at"),
    })
}
