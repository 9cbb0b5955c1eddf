//! CRUD access to media items, speakers and survey responses.
//!
//! Every backend failure is logged with its entity, operation and id and
//! returned as [`GatewayError::Transport`].

pub mod error;
mod files;
pub mod mapping;
mod media;
mod speakers;
mod survey;

use crate::db::Database;
use crate::s3::Storage;

pub use error::{Entity, GatewayError, TransportSource};
pub use files::{object_key, object_key_at};

pub struct Gateway<D, S> {
    db: D,
    storage: S,
}

impl<D: Database, S: Storage> Gateway<D, S> {
    pub fn new(db: D, storage: S) -> Self {
        Self { db, storage }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
