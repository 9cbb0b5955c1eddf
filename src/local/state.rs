use crate::local::error::LocalStoreError;
use crate::local::snapshot::LegacySnapshot;
use crate::local::store::LocalStore;
use tracing::{debug, info};

pub const ADMIN_AUTH_KEY: &str = "admin_auth";

/// Process-wide persisted state, passed explicitly to whoever needs it
pub struct AppState<L: LocalStore> {
    store: L,
    is_admin: bool,
    legacy: LegacySnapshot,
}

impl<L: LocalStore> AppState<L> {
    /// Load persisted state, falling back to defaults for anything missing
    pub async fn init(store: L) -> Result<Self, LocalStoreError> {
        let is_admin = store
            .get(ADMIN_AUTH_KEY)
            .await?
            .is_some_and(|value| value == "true");
        let legacy = LegacySnapshot::load(&store).await?;

        info!("Application state initialized (admin session: {is_admin})");
        Ok(Self {
            store,
            is_admin,
            legacy,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Record an admin session; credential checking happens elsewhere
    pub async fn login(&mut self) -> Result<(), LocalStoreError> {
        self.store.set(ADMIN_AUTH_KEY, "true").await?;
        self.is_admin = true;
        debug!("Admin session started");
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), LocalStoreError> {
        self.store.remove(ADMIN_AUTH_KEY).await?;
        self.is_admin = false;
        debug!("Admin session ended");
        Ok(())
    }

    pub fn legacy(&self) -> &LegacySnapshot {
        &self.legacy
    }

    pub fn legacy_mut(&mut self) -> &mut LegacySnapshot {
        &mut self.legacy
    }

    pub async fn save_legacy(&self) -> Result<(), LocalStoreError> {
        self.legacy.persist(&self.store).await
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    /// Nothing is buffered, so teardown only hands the store back
    pub fn teardown(self) -> L {
        debug!("Application state torn down");
        self.store
    }
}
