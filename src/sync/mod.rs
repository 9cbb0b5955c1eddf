//! Keeps the locally cached collections in step with the remote store.
//!
//! Reconciliation is a full overwrite: a local edit that has not been
//! confirmed remotely is lost if a cycle lands first.

pub mod state;
pub mod synchronizer;
#[cfg(test)]
mod tests;

pub use state::{Collection, FetchState, SharedViewState, ViewState};
pub use synchronizer::{CycleReport, Synchronizer, DEFAULT_SYNC_INTERVAL, MIN_SYNC_INTERVAL};
