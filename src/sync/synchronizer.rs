use crate::db::Database;
use crate::gateway::{Gateway, GatewayError};
use crate::s3::Storage;
use crate::sync::state::{Collection, FetchState, SharedViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default time between reconciliation cycles
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Shorter intervals are raised to this; a zero period would stop the loop
pub const MIN_SYNC_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of one reconciliation cycle per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub media: FetchState,
    pub speakers: FetchState,
    pub survey_responses: FetchState,
}

impl CycleReport {
    pub fn all_reconciled(&self) -> bool {
        [self.media, self.speakers, self.survey_responses]
            .iter()
            .all(|state| *state == FetchState::Reconciled)
    }
}

/// Periodically replaces the local view with the remote collections
pub struct Synchronizer<D, S> {
    gateway: Arc<Gateway<D, S>>,
    view: SharedViewState,
    interval: Duration,
}

impl<D: Database, S: Storage> Synchronizer<D, S> {
    pub fn new(gateway: Arc<Gateway<D, S>>, view: SharedViewState) -> Self {
        Self {
            gateway,
            view,
            interval: DEFAULT_SYNC_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval < MIN_SYNC_INTERVAL {
            warn!(
                "Sync interval {:?} is too short, using {:?}",
                interval, MIN_SYNC_INTERVAL
            );
        }
        self.interval = interval.max(MIN_SYNC_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn view(&self) -> &SharedViewState {
        &self.view
    }

    /// Fetch all three collections concurrently and overwrite the local copies.
    ///
    /// Returns `None` when `cancel` fired before the results were applied. The
    /// cached items are then left as they were and an in-flight fetch state
    /// goes back to `Idle`.
    pub async fn reconcile_once(&self, cancel: &CancellationToken) -> Option<CycleReport> {
        {
            let mut view = self.view.write().await;
            if cancel.is_cancelled() {
                return None;
            }
            view.media.begin_fetch();
            view.speakers.begin_fetch();
            view.survey_responses.begin_fetch();
        }

        debug!("Fetching media, speakers and survey responses");
        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Reconciliation cancelled while fetching");
                self.abandon_fetch().await;
                return None;
            }
            fetched = async {
                tokio::join!(
                    self.gateway.fetch_media_items(),
                    self.gateway.fetch_speakers(),
                    self.gateway.fetch_survey_responses(),
                )
            } => fetched,
        };
        let (media, speakers, survey_responses) = fetched;

        let mut view = self.view.write().await;
        if cancel.is_cancelled() {
            view.media.abandon_fetch();
            view.speakers.abandon_fetch();
            view.survey_responses.abandon_fetch();
            return None;
        }
        let report = CycleReport {
            media: apply("media items", &mut view.media, media),
            speakers: apply("speakers", &mut view.speakers, speakers),
            survey_responses: apply(
                "survey responses",
                &mut view.survey_responses,
                survey_responses,
            ),
        };
        Some(report)
    }

    async fn abandon_fetch(&self) {
        let mut view = self.view.write().await;
        view.media.abandon_fetch();
        view.speakers.abandon_fetch();
        view.survey_responses.abandon_fetch();
    }

    /// Reconcile immediately, then every interval until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "Synchronization loop started (interval: {}s)",
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Synchronization loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(report) = self.reconcile_once(&cancel).await {
                        if report.all_reconciled() {
                            debug!("Reconciliation cycle completed");
                        }
                    }
                }
            }
        }
    }

    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}

fn apply<T>(
    label: &str,
    collection: &mut Collection<T>,
    fetched: Result<Vec<T>, GatewayError>,
) -> FetchState {
    match fetched {
        Ok(items) => {
            debug!("Reconciled {} {label}", items.len());
            collection.reconcile(items);
        }
        Err(e) => {
            warn!("Keeping cached {label} after failed fetch: {e}");
            collection.fail();
        }
    }
    collection.state
}
