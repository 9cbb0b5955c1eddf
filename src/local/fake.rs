use crate::local::error::LocalStoreError;
use crate::local::store::LocalStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory LocalStore for tests
#[derive(Clone, Default)]
pub struct FakeLocalStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl FakeLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, e.g. a legacy snapshot entry
    pub fn fake_put(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fake_get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl LocalStore for FakeLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.fake_get(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.fake_put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        self.values.write().unwrap().remove(key);
        Ok(())
    }
}
