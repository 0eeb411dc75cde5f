pub mod session_sweep;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::WorkerConfig;
use crate::store::Store;

/// Drives the periodic background jobs. Only the session sweep exists
/// today; the loop structure leaves room for more.
pub struct WorkerManager {
    store: Arc<Store>,
    shutdown_rx: broadcast::Receiver<()>,
    sweep_interval: Duration,
}

impl WorkerManager {
    pub fn new(
        store: Arc<Store>,
        shutdown_rx: broadcast::Receiver<()>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            store,
            shutdown_rx,
            sweep_interval: Duration::from_secs(config.session_sweep_interval_secs.max(1)),
        }
    }

    pub async fn start(mut self) {
        tracing::info!(interval_secs = self.sweep_interval.as_secs(), "Worker manager started");
        let mut ticker = tokio::time::interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    session_sweep::run(&self.store);
                }
                _ = self.shutdown_rx.recv() => {
                    tracing::info!("Worker manager shutting down");
                    return;
                }
            }
        }
    }
}
