//! One-shot copy of legacy local records into the remote stores.

pub mod check;
#[cfg(test)]
pub mod fake;
pub mod fetch;
pub mod migrator;

pub use check::{check_sync, CollectionCheck, SyncCheckReport};
#[cfg(test)]
pub use fake::FakeFileSource;
pub use fetch::{FetchError, FetchedFile, FileSource, HttpFileSource};
pub use migrator::{CollectionReport, MigrationReport, Migrator};
