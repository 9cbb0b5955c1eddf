use crate::local::error::LocalStoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// String key/value persistence for state that outlives a session
#[async_trait]
pub trait LocalStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

#[async_trait]
impl<T: LocalStore + ?Sized> LocalStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        (**self).remove(key).await
    }
}
