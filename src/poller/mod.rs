//! Per-family polling pipeline.
//!
//! Each family gets its own poller that fetches a snapshot on an interval,
//! decodes it, reconciles it against the visuals it already created and
//! applies the resulting actions to the shared store.

mod source;

pub use source::{HttpSnapshotSource, SnapshotSource};

use crate::assets::AssetResolver;
use crate::decode::decode_snapshot;
use crate::entity::SnapshotEntity;
use crate::reconcile::{KnownVisuals, Reconciler};
use crate::scene::VisualStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Status information for a family poller.
#[derive(Clone, Debug, Default)]
pub struct PollerStatus {
    /// Last successful poll timestamp
    pub last_poll: Option<DateTime<Utc>>,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// Total number of successful polls
    pub poll_count: u64,
    /// Total number of failed polls
    pub error_count: u64,
    /// Actions produced by the last successful poll
    pub last_action_count: usize,
}

/// Drives one family's fetch → decode → reconcile → apply pipeline.
///
/// The poller owns its family's `KnownVisuals`; ticks run one after another,
/// so two passes for the same family never overlap.
pub struct FamilyPoller<E, S> {
    source: Arc<dyn SnapshotSource>,
    reconciler: Reconciler,
    known: KnownVisuals,
    assets: Arc<dyn AssetResolver>,
    store: Arc<Mutex<S>>,
    poll_interval: Duration,
    status: Arc<Mutex<PollerStatus>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> FamilyPoller<E, S>
where
    E: SnapshotEntity,
    S: VisualStore,
{
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        reconciler: Reconciler,
        assets: Arc<dyn AssetResolver>,
        store: Arc<Mutex<S>>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            reconciler,
            known: KnownVisuals::new(),
            assets,
            store,
            poll_interval,
            status: Arc::new(Mutex::new(PollerStatus::default())),
            _entity: PhantomData,
        }
    }

    /// Returns a clone of the status tracker for external monitoring.
    pub fn status(&self) -> Arc<Mutex<PollerStatus>> {
        Arc::clone(&self.status)
    }

    pub fn known(&self) -> &KnownVisuals {
        &self.known
    }

    /// Run one tick: fetch, decode, reconcile and apply.
    ///
    /// Returns the number of actions applied. A fetch or decode failure
    /// leaves the store and `KnownVisuals` untouched.
    pub async fn tick(&mut self) -> Result<usize> {
        let document = self
            .source
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch {} snapshot", E::FAMILY))?;
        let snapshot: Vec<E> = decode_snapshot(&document)?;

        let actions = self
            .reconciler
            .reconcile(&snapshot, &mut self.known, self.assets.as_ref());

        let warnings = actions.iter().filter(|action| action.is_warning()).count();
        if warnings > 0 {
            debug!(
                family = %E::FAMILY,
                warnings = warnings,
                "Snapshot reconciled with missing sprites"
            );
        }

        self.store.lock().await.apply_all(&actions);

        debug!(
            family = %E::FAMILY,
            entities = snapshot.len(),
            actions = actions.len(),
            "Reconciled snapshot"
        );

        Ok(actions.len())
    }

    /// Run one tick and record the outcome in the status tracker.
    pub async fn poll_once(&mut self) {
        match self.tick().await {
            Ok(action_count) => {
                let mut status = self.status.lock().await;
                status.last_poll = Some(Utc::now());
                status.last_error = None;
                status.poll_count += 1;
                status.last_action_count = action_count;
            }
            Err(e) => {
                error!(
                    family = %E::FAMILY,
                    source = %self.source.describe(),
                    error = %format!("{:#}", e),
                    "Poll failed, skipping tick"
                );

                let mut status = self.status.lock().await;
                status.last_error = Some(format!("{:#}", e));
                status.error_count += 1;
            }
        }
    }
}

impl<E, S> FamilyPoller<E, S>
where
    E: SnapshotEntity + Send + 'static,
    S: VisualStore + 'static,
{
    /// Starts the polling loop (non-blocking).
    ///
    /// Spawns a background task that polls on schedule. A slow tick delays
    /// the next one rather than overlapping it. Returns a JoinHandle that
    /// can be aborted for shutdown.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut poller = self;

            info!(
                family = %E::FAMILY,
                source = %poller.source.describe(),
                interval_ms = poller.poll_interval.as_millis() as u64,
                "Starting family poller"
            );

            // A zero period would panic inside tokio
            let period = poller.poll_interval.max(Duration::from_millis(1));
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                poller.poll_once().await;
            }
        })
    }
}
