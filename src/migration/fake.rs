use crate::migration::fetch::{FetchError, FetchedFile, FileSource};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Serves preloaded files by URL; anything else is a 404
#[derive(Clone, Default)]
pub struct FakeFileSource {
    files: Arc<RwLock<HashMap<String, FetchedFile>>>,
    fetches: Arc<AtomicUsize>,
}

impl FakeFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fake_serve(&self, url: &str, data: &str, content_type: &str) {
        self.files.write().unwrap().insert(
            url.to_string(),
            FetchedFile {
                data: Bytes::from(data.to_string()),
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for FakeFileSource {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if url.is_empty() {
            return Err(FetchError::EmptyUrl);
        }
        self.files
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
