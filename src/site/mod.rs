//! The running site: cached view, persisted app state and the user actions
//! that change both.
//!
//! Creates and saves update the cached view only after the remote store
//! confirmed them. Deletes always drop the record from the view, and a failed
//! remote delete is logged and still returned to the caller.

mod actions;

use crate::db::Database;
use crate::gateway::Gateway;
use crate::local::{AppState, LocalStore, LocalStoreError};
use crate::migration::{check_sync, FileSource, MigrationReport, Migrator, SyncCheckReport};
use crate::models::{export_csv, MediaStats};
use crate::s3::Storage;
use crate::sync::{SharedViewState, Synchronizer, ViewState};
use crate::upload::Uploader;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct Site<D, S, L: LocalStore> {
    gateway: Arc<Gateway<D, S>>,
    uploader: Uploader<D, S>,
    synchronizer: Arc<Synchronizer<D, S>>,
    view: SharedViewState,
    state: AppState<L>,
    sync: Option<SyncHandle>,
}

impl<D: Database, S: Storage, L: LocalStore> Site<D, S, L> {
    pub fn new(gateway: Arc<Gateway<D, S>>, state: AppState<L>, interval: Duration) -> Self {
        let view = ViewState::shared();
        let synchronizer =
            Arc::new(Synchronizer::new(gateway.clone(), view.clone()).with_interval(interval));
        Self {
            uploader: Uploader::new(gateway.clone()),
            gateway,
            synchronizer,
            view,
            state,
            sync: None,
        }
    }

    /// Start reconciling: once now, then every interval
    pub fn mount(&mut self) {
        if self.sync.is_some() {
            warn!("Site is already mounted");
            return;
        }
        let cancel = CancellationToken::new();
        let task = self.synchronizer.clone().spawn(cancel.clone());
        self.sync = Some(SyncHandle { cancel, task });
        info!("Site mounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.sync.is_some()
    }

    /// Stop the sync loop; no fetch result is applied after this returns
    pub async fn unmount(&mut self) {
        if let Some(handle) = self.sync.take() {
            handle.cancel.cancel();
            if let Err(e) = handle.task.await {
                warn!("Sync loop ended abnormally: {e}");
            }
            info!("Site unmounted");
        }
    }

    /// Unmount and hand back the local store
    pub async fn teardown(mut self) -> L {
        self.unmount().await;
        self.state.teardown()
    }

    pub fn view(&self) -> &SharedViewState {
        &self.view
    }

    pub fn gateway(&self) -> &Arc<Gateway<D, S>> {
        &self.gateway
    }

    pub fn state(&self) -> &AppState<L> {
        &self.state
    }

    pub async fn login(&mut self) -> Result<(), LocalStoreError> {
        self.state.login().await
    }

    pub async fn logout(&mut self) -> Result<(), LocalStoreError> {
        self.state.logout().await
    }

    /// Run one reconciliation outside the loop, e.g. right after a migration
    pub async fn refresh(&self) {
        let cancel = match &self.sync {
            Some(handle) => handle.cancel.clone(),
            None => CancellationToken::new(),
        };
        self.synchronizer.reconcile_once(&cancel).await;
    }

    pub async fn media_stats(&self) -> MediaStats {
        MediaStats::from_items(&self.view.read().await.media.items)
    }

    pub async fn export_survey_csv(&self) -> String {
        export_csv(&self.view.read().await.survey_responses.items)
    }

    /// Migrate the legacy snapshot and persist what it wrote back
    pub async fn migrate<F: FileSource>(
        &mut self,
        files: F,
    ) -> Result<MigrationReport, LocalStoreError> {
        let migrator = Migrator::new(self.gateway.clone(), files);
        let report = migrator.run(self.state.legacy_mut()).await;
        self.state.save_legacy().await?;
        self.refresh().await;
        Ok(report)
    }

    pub async fn check_sync(&self) -> SyncCheckReport {
        check_sync(&self.gateway, self.state.legacy()).await
    }
}
