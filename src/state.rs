use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            store,
            config: Arc::new(config.clone()),
            shutdown_tx,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_tx(&self) -> &broadcast::Sender<()> {
        &self.shutdown_tx
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::broadcast;

    use crate::config::Config;
    use crate::store::Store;

    use super::*;

    fn test_state(name: &str) -> (tempfile::TempDir, AppState) {
        let cfg = Config::from_env();
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(Store::open(tmp.path().join(name).to_str().unwrap()).unwrap());
        let (tx, _) = broadcast::channel(4);
        (tmp, AppState::new(store, &cfg, tx))
    }

    #[tokio::test]
    async fn shutdown_receiver_can_clone() {
        let (_tmp, state) = test_state("state_shutdown.sled");

        let mut rx1 = state.shutdown_rx();
        let mut rx2 = state.shutdown_rx();
        state.shutdown_tx().send(()).unwrap();
        rx1.recv().await.unwrap();
        rx2.recv().await.unwrap();
    }

    #[tokio::test]
    async fn uptime_is_monotonic() {
        let (_tmp, state) = test_state("state_uptime.sled");
        let first = state.uptime_secs();
        assert!(state.uptime_secs() >= first);
    }
}
