use crate::config::DatabaseConfig;
use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{
    MediaItemChanges, MediaItemRow, SpeakerChanges, SpeakerRow, SurveyResponseRow, Table,
};
use crate::db::pg_schema::{
    added_columns, media_item_from_row, speaker_from_row, survey_response_from_row,
    table_definition, MEDIA_ITEM_COLUMNS, SPEAKER_COLUMNS, SURVEY_RESPONSE_COLUMNS,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

/// A PostgreSQL implementation of the Database trait
pub struct PostgresDatabase {
    pool: PgPool,
    schema: Option<String>,
}

fn query_error(operation: &str, table: Table, id: Option<&str>, e: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return DatabaseError::Duplicate(id.unwrap_or_default().to_string());
        }
    }
    if matches!(
        e,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    ) {
        error!("Lost connection during {} on {}: {}", operation, table, e);
        return DatabaseError::ConnectionError(e.to_string());
    }
    error!(
        "Failed to {} {} (id={}): {}",
        operation,
        table,
        id.unwrap_or("-"),
        e
    );
    DatabaseError::QueryError(e.to_string())
}

impl PostgresDatabase {
    /// Create a new PostgresDatabase from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::new_with_schema(&config.url, config.max_connections, None).await
    }

    /// Create a new PostgresDatabase whose tables live in `schema`
    pub async fn new_with_schema(
        database_url: &str,
        max_connections: u32,
        schema: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy(database_url)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                DatabaseError::ConnectionError(e.to_string())
            })?;

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            error!("Database connectivity test failed: {}", e);
            return Err(DatabaseError::ConnectionError(format!(
                "Database is not accessible: {}",
                e
            )));
        };

        let db = PostgresDatabase { pool, schema };
        db.initialize_schema().await?;

        info!("PostgreSQL database connection established successfully");
        Ok(db)
    }

    /// Create the tables if they do not exist yet
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        if let Some(schema_name) = &self.schema {
            let create_schema_query = format!("CREATE SCHEMA IF NOT EXISTS {}", schema_name);
            debug!("Executing: {}", create_schema_query);
            sqlx::query(&create_schema_query)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to create schema '{}': {}", schema_name, e);
                    DatabaseError::QueryError(format!("Failed to create schema: {}", e))
                })?;
        }

        for table in [Table::MediaItems, Table::Speakers, Table::SurveyResponses] {
            let create_table_query = format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                self.table_name(table),
                table_definition(table)
            );

            debug!("Creating {} table", table);
            sqlx::query(&create_table_query)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to create {} table: {}", table, e);
                    DatabaseError::QueryError(format!("Failed to create table: {}", e))
                })?;

            for (column, column_type) in added_columns(table) {
                let alter_query = format!(
                    "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                    self.table_name(table),
                    column,
                    column_type
                );
                sqlx::query(&alter_query)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| {
                        error!("Failed to add column {}.{}: {}", table, column, e);
                        DatabaseError::QueryError(format!("Failed to add column: {}", e))
                    })?;
            }
        }

        info!("Schema initialization completed successfully");
        Ok(())
    }

    /// Get the table name with schema prefix if applicable
    fn table_name(&self, table: Table) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, table),
            None => table.to_string(),
        }
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn insert_media_item(&self, row: MediaItemRow) -> Result<MediaItemRow, DatabaseError> {
        debug!("Inserting media item {}", row.id);
        let query = format!(
            "INSERT INTO {} ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {cols}",
            self.table_name(Table::MediaItems),
            cols = MEDIA_ITEM_COLUMNS
        );

        let inserted = sqlx::query(&query)
            .bind(&row.id)
            .bind(&row.name)
            .bind(&row.media_type)
            .bind(&row.url)
            .bind(&row.thumbnail)
            .bind(row.size)
            .bind(row.upload_date)
            .bind(row.is_youtube)
            .bind(&row.youtube_id)
            .bind(&row.storage_path)
            .bind(&row.storage_bucket)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("insert", Table::MediaItems, Some(&row.id), e))?;

        media_item_from_row(&inserted)
    }

    async fn get_media_item(&self, id: &str) -> Result<Option<MediaItemRow>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            MEDIA_ITEM_COLUMNS,
            self.table_name(Table::MediaItems)
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("select", Table::MediaItems, Some(id), e))?;

        row.as_ref().map(media_item_from_row).transpose()
    }

    async fn list_media_items(&self) -> Result<Vec<MediaItemRow>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY upload_date DESC",
            MEDIA_ITEM_COLUMNS,
            self.table_name(Table::MediaItems)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list", Table::MediaItems, None, e))?;

        debug!("Query returned {} media items", rows.len());
        rows.iter().map(media_item_from_row).collect()
    }

    async fn update_media_item(
        &self,
        id: &str,
        changes: MediaItemChanges,
    ) -> Result<MediaItemRow, DatabaseError> {
        let table_name = self.table_name(Table::MediaItems);
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET id = id", table_name));

        if let Some(name) = changes.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(url) = changes.url {
            builder.push(", url = ").push_bind(url);
        }
        if let Some(thumbnail) = changes.thumbnail {
            builder.push(", thumbnail = ").push_bind(thumbnail);
        }
        if let Some(size) = changes.size {
            builder.push(", size = ").push_bind(size);
        }
        if let Some(path) = changes.storage_path {
            builder.push(", storage_path = ").push_bind(path);
        }
        if let Some(bucket) = changes.storage_bucket {
            builder.push(", storage_bucket = ").push_bind(bucket);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(format!(" RETURNING {}", MEDIA_ITEM_COLUMNS));

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("update", Table::MediaItems, Some(id), e))?
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

        media_item_from_row(&row)
    }

    async fn delete_media_item(&self, id: &str) -> Result<bool, DatabaseError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1",
            self.table_name(Table::MediaItems)
        );

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete", Table::MediaItems, Some(id), e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_speaker(&self, row: SpeakerRow) -> Result<SpeakerRow, DatabaseError> {
        debug!("Inserting speaker {}", row.id);
        let query = format!(
            "INSERT INTO {} ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            self.table_name(Table::Speakers),
            cols = SPEAKER_COLUMNS
        );
        let id = row.id.to_string();

        let inserted = sqlx::query(&query)
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.role)
            .bind(&row.bio)
            .bind(&row.photo_url)
            .bind(&row.photo_storage_path)
            .bind(&row.photo_storage_bucket)
            .bind(row.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("insert", Table::Speakers, Some(&id), e))?;

        speaker_from_row(&inserted)
    }

    async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            SPEAKER_COLUMNS,
            self.table_name(Table::Speakers)
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("select", Table::Speakers, Some(&id.to_string()), e))?;

        row.as_ref().map(speaker_from_row).transpose()
    }

    async fn list_speakers(&self) -> Result<Vec<SpeakerRow>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY name ASC",
            SPEAKER_COLUMNS,
            self.table_name(Table::Speakers)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list", Table::Speakers, None, e))?;

        debug!("Query returned {} speakers", rows.len());
        rows.iter().map(speaker_from_row).collect()
    }

    async fn update_speaker(
        &self,
        id: Uuid,
        changes: SpeakerChanges,
    ) -> Result<SpeakerRow, DatabaseError> {
        let table_name = self.table_name(Table::Speakers);
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET id = id", table_name));

        if let Some(name) = changes.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(role) = changes.role {
            builder.push(", role = ").push_bind(role);
        }
        if let Some(bio) = changes.bio {
            builder.push(", bio = ").push_bind(bio);
        }
        if let Some(photo_url) = changes.photo_url {
            builder.push(", photo_url = ").push_bind(photo_url);
        }
        if let Some(path) = changes.photo_storage_path {
            builder.push(", photo_storage_path = ").push_bind(path);
        }
        if let Some(bucket) = changes.photo_storage_bucket {
            builder.push(", photo_storage_bucket = ").push_bind(bucket);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", SPEAKER_COLUMNS));

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("update", Table::Speakers, Some(&id.to_string()), e))?
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

        speaker_from_row(&row)
    }

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1",
            self.table_name(Table::Speakers)
        );

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete", Table::Speakers, Some(&id.to_string()), e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_survey_response(
        &self,
        row: SurveyResponseRow,
    ) -> Result<SurveyResponseRow, DatabaseError> {
        debug!("Inserting survey response {}", row.id);
        let query = format!(
            "INSERT INTO {} ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            self.table_name(Table::SurveyResponses),
            cols = SURVEY_RESPONSE_COLUMNS
        );
        let id = row.id.to_string();

        let inserted = sqlx::query(&query)
            .bind(row.id)
            .bind(&row.full_name)
            .bind(&row.contacts)
            .bind(&row.occupation)
            .bind(&row.answers)
            .bind(row.submitted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("insert", Table::SurveyResponses, Some(&id), e))?;

        survey_response_from_row(&inserted)
    }

    async fn list_survey_responses(&self) -> Result<Vec<SurveyResponseRow>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY submitted_at DESC",
            SURVEY_RESPONSE_COLUMNS,
            self.table_name(Table::SurveyResponses)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list", Table::SurveyResponses, None, e))?;

        debug!("Query returned {} survey responses", rows.len());
        rows.iter().map(survey_response_from_row).collect()
    }

    async fn delete_survey_response(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1",
            self.table_name(Table::SurveyResponses)
        );

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                query_error("delete", Table::SurveyResponses, Some(&id.to_string()), e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
