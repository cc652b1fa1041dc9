//! Fixed-interval collection loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stormwatch_adapters::{CollectError, Collector, CycleReport, UiTransport};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// One poll-fetch-publish pass.
#[async_trait]
pub trait CollectionCycle: Send + Sync {
    async fn run_cycle(&self) -> Result<CycleReport, CollectError>;
}

#[async_trait]
impl<T: UiTransport> CollectionCycle for Collector<T> {
    async fn run_cycle(&self) -> Result<CycleReport, CollectError> {
        self.collect().await
    }
}

/// Runs a [`CollectionCycle`] every `interval`, starting immediately.
///
/// Cycles never overlap: a tick that fires while a cycle is still running is
/// dropped rather than queued.
pub struct Poller<C> {
    cycle: Arc<C>,
    interval: Duration,
}

impl<C: CollectionCycle + 'static> Poller<C> {
    pub fn new(cycle: Arc<C>, interval: Duration) -> Self {
        Self { cycle, interval }
    }

    /// Spawn the loop on the current runtime.
    pub fn start(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_once(self.cycle.as_ref()).await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        PollerHandle { stop_tx, task }
    }
}

async fn run_once<C: CollectionCycle + ?Sized>(cycle: &C) {
    match cycle.run_cycle().await {
        Ok(report) => info!(
            topologies = report.topologies,
            details_published = report.details_published,
            details_skipped = report.details_skipped,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Collection cycle complete"
        ),
        Err(e) => error!(error = %e, "Failed to fetch topology summary"),
    }
}

/// Handle to a running [`Poller`].
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the in-flight cycle, if any, to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    /// True once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
