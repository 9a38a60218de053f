//! Service runtime.
//!
//! Provides [`ServiceHandle`] that encapsulates the service lifecycle:
//! metrics, database init, migrations, service wiring, the background
//! expiry sweeper and graceful shutdown.

use std::sync::{Arc, OnceLock};

use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{BookingConflictService, SweeperTask, SystemClock};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, SeaOrmRepositoryProvider};
use crate::notifications::{create_event_bus, EventBusNotifier, SharedEventBus};
use crate::shared::errors::{AppError, InfraError};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServiceOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Start the background sweeper when `sweeper.enabled` (default: true).
    /// One-shot commands turn this off.
    pub background_tasks: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            background_tasks: true,
        }
    }
}

// ── ServiceHandle ──────────────────────────────────────────────────

/// Handle to a running booking conflict service.
///
/// # Examples
///
/// ```rust,no_run
/// use hotel_booking::server::{ServiceHandle, ServiceOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServiceHandle::start(ServiceOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServiceHandle {
    /// The booking conflict service.
    pub service: Arc<BookingConflictService>,
    /// Event bus carrying confirmation events.
    pub event_bus: SharedEventBus,
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the service was started with.
    pub config: AppConfig,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    sweeper_task: Option<JoinHandle<()>>,
}

impl ServiceHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus exporter (if enabled)
    /// 2. Connect to the database and run migrations
    /// 3. Wire repositories, notifier and services
    /// 4. Start the waiting list sweeper (if enabled)
    pub async fn start(opts: ServiceOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting hotel booking conflict service...");

        if app_cfg.metrics.enabled {
            install_metrics_exporter(&app_cfg)?;
        }

        // ── Database ───────────────────────────────────────────
        let db_config = app_cfg.database_config();
        let db = init_database(&db_config).await.map_err(InfraError::from)?;

        if opts.auto_migrate {
            run_migrations(&db).await.map_err(InfraError::from)?;
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let event_bus = create_event_bus();
        let notifier = Arc::new(EventBusNotifier::new(event_bus.clone()));

        let service = Arc::new(
            BookingConflictService::new(repos.clone(), Arc::new(SystemClock), notifier)
                .with_waiting_list_config(app_cfg.waiting_list_config())
                .with_expiry(app_cfg.expiry_policy(), app_cfg.sweeper.batch_size),
        );

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);

        // ── Background tasks ───────────────────────────────────
        let sweeper_task = if opts.background_tasks && app_cfg.sweeper.enabled {
            let task = SweeperTask::new(service.sweeper(), service.clock())
                .with_config(app_cfg.sweeper_config());
            Some(task.start(shutdown.signal()))
        } else {
            info!("Waiting list sweeper disabled");
            None
        };

        info!("Service started");

        Ok(Self {
            service,
            event_bus,
            repos,
            config: app_cfg,
            db,
            shutdown,
            sweeper_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    ///
    /// Call [`wait`](Self::wait) to block until everything has stopped.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the service to fully stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("Waiting for background tasks to complete...");

        let Self {
            db,
            shutdown,
            sweeper_task,
            ..
        } = self;

        shutdown
            .run_cleanup(|| async move {
                if let Some(task) = sweeper_task {
                    if let Err(e) = task.await {
                        error!("Sweeper task panicked: {}", e);
                    }
                }

                if let Err(e) = db.close().await {
                    warn!("Error closing database connection: {}", e);
                } else {
                    info!("Database connection closed");
                }
            })
            .await;

        info!("Hotel booking conflict service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down hotel booking conflict service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Whether background work is still running.
    pub fn is_running(&self) -> bool {
        self.sweeper_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Install the Prometheus HTTP exporter. The global recorder can only be
/// installed once per process; later calls are no-ops.
fn install_metrics_exporter(config: &AppConfig) -> Result<(), InfraError> {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let addr = config.metrics_addr()?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| InfraError::Metrics(e.to_string()))?;
    crate::shared::metrics::describe();
    let _ = INSTALLED.set(());

    info!("Prometheus metrics exporter listening on http://{}", addr);
    Ok(())
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServiceHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn in_memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;
        config.sweeper.interval_secs = 1;
        config
    }

    #[tokio::test]
    async fn starts_serves_and_shuts_down() {
        let handle = ServiceHandle::start(ServiceOptions {
            config: in_memory_config(),
            ..ServiceOptions::default()
        })
        .await
        .unwrap();
        assert!(handle.is_running());

        let day = |d| chrono::NaiveDate::from_ymd_opt(2030, 1, d).unwrap();
        let entry = handle
            .service
            .join_waiting_list(100, 7, day(20), day(22), 2)
            .await
            .unwrap();
        assert!(entry.is_waiting());

        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown hung");
    }

    #[tokio::test]
    async fn background_tasks_can_be_skipped() {
        let handle = ServiceHandle::start(ServiceOptions {
            config: in_memory_config(),
            auto_migrate: true,
            background_tasks: false,
        })
        .await
        .unwrap();
        assert!(!handle.is_running());
        assert_eq!(handle.service.cleanup_expired_waiting_list().await.unwrap(), 0);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let mut config = in_memory_config();
        config.sweeper.batch_size = 0;
        let result = ServiceHandle::start(ServiceOptions {
            config,
            ..ServiceOptions::default()
        })
        .await;
        assert!(matches!(result, Err(AppError::Infra(InfraError::InvalidConfig(_)))));
    }
}
