pub mod error;
#[cfg(test)]
pub mod fake;
pub mod snapshot;
pub mod sqlite;
pub mod state;
pub mod store;
#[cfg(test)]
mod tests;

pub use error::LocalStoreError;
#[cfg(test)]
pub use fake::FakeLocalStore;
pub use snapshot::LegacySnapshot;
pub use sqlite::SqliteLocalStore;
pub use state::AppState;
pub use store::LocalStore;
