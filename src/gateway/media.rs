use super::{Entity, Gateway, GatewayError};
use crate::db::{Database, MediaItemRow};
use crate::models::{MediaItem, MediaItemPatch, MediaSource};
use crate::s3::Storage;
use tracing::{debug, info, warn};

impl<D: Database, S: Storage> Gateway<D, S> {
    pub async fn create_media_item(&self, item: &MediaItem) -> Result<MediaItem, GatewayError> {
        item.check_source().map_err(GatewayError::Validation)?;
        let row = MediaItemRow::from(item);
        let saved = self.db.insert_media_item(row).await.map_err(|e| {
            GatewayError::transport(Entity::MediaItem, "create", Some(&item.id), e)
        })?;

        MediaItem::try_from(saved)
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "create", Some(&item.id), e))
    }

    /// All media items, newest first. Rows that fail to map are skipped.
    pub async fn fetch_media_items(&self) -> Result<Vec<MediaItem>, GatewayError> {
        let rows = self
            .db
            .list_media_items()
            .await
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "fetch", None, e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match MediaItem::try_from(row) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping media item {}: {}", id, e),
            }
        }
        debug!("Fetched {} media items", items.len());
        Ok(items)
    }

    pub async fn update_media_item(
        &self,
        id: &str,
        patch: MediaItemPatch,
    ) -> Result<MediaItem, GatewayError> {
        let row = self
            .db
            .update_media_item(id, patch.into())
            .await
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "update", Some(id), e))?;

        MediaItem::try_from(row)
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "update", Some(id), e))
    }

    /// Delete a media item and the file behind it.
    ///
    /// A stored file is removed before the row. If that fails the row is kept
    /// and the error returned. YouTube links never touch the object store.
    pub async fn delete_media_item(&self, id: &str) -> Result<bool, GatewayError> {
        let row = self
            .db
            .get_media_item(id)
            .await
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "delete", Some(id), e))?;

        let Some(row) = row else {
            debug!("Media item {} is already gone", id);
            return Ok(false);
        };

        let item = MediaItem::try_from(row)
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "delete", Some(id), e))?;

        match item.source() {
            MediaSource::YouTube { .. } | MediaSource::External => {}
            MediaSource::Stored { path, bucket } => {
                self.remove_file(Entity::MediaItem, bucket, path).await?;
            }
        }

        let removed = self
            .db
            .delete_media_item(id)
            .await
            .map_err(|e| GatewayError::transport(Entity::MediaItem, "delete", Some(id), e))?;

        info!("Deleted media item {}", id);
        Ok(removed)
    }
}
