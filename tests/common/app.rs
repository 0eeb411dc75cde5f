use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use training_backend::config::{Config, StatsConfig, WorkerConfig};
use training_backend::routes::build_router;
use training_backend::state::AppState;
use training_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_min_users(1).await
}

pub async fn spawn_with_min_users(min_users: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("training-test.sled");

    // Construct Config directly instead of going through set_var; env
    // mutation races across parallel test threads.
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        jwt_secret: format!("integration-test-jwt-secret-{}", uuid::Uuid::new_v4()),
        jwt_expires_in_hours: 24,
        cors_origin: "http://localhost:5173".to_string(),
        stats: StatsConfig { min_users },
        worker: WorkerConfig {
            is_leader: false,
            session_sweep_interval_secs: 3_600,
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let state = AppState::new(store, &config, shutdown_tx);

    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}
