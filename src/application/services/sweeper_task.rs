//! Background expiry sweeper
//!
//! Runs the expiration sweep on a fixed interval until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::expiration::ExpirationSweeper;
use crate::application::ports::SharedClock;
use crate::domain::ExpiryPolicy;
use crate::shared::shutdown::ShutdownSignal;

/// Configuration for the sweeper task
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to sweep
    pub interval: Duration,
    /// Which entries count as stale
    pub policy: ExpiryPolicy,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            policy: ExpiryPolicy::default(),
        }
    }
}

pub struct SweeperTask {
    sweeper: Arc<ExpirationSweeper>,
    clock: SharedClock,
    config: SweeperConfig,
    /// Running state
    running: Arc<RwLock<bool>>,
}

impl SweeperTask {
    pub fn new(sweeper: Arc<ExpirationSweeper>, clock: SharedClock) -> Self {
        Self {
            sweeper,
            clock,
            config: SweeperConfig::default(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn with_config(mut self, config: SweeperConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the sweeper background task
    pub fn start(&self, shutdown: ShutdownSignal) -> JoinHandle<()> {
        let sweeper = self.sweeper.clone();
        let clock = self.clock.clone();
        let config = self.config.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            *running.write().await = true;

            info!(
                interval_secs = config.interval.as_secs(),
                expire_after_check_in = config.policy.expire_after_check_in,
                max_age_hours = config.policy.max_age.map(|age| age.num_hours()),
                "Waiting list sweeper started"
            );

            let mut interval = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = sweeper.sweep(clock.now(), &config.policy).await {
                            warn!(error = %e, transient = e.is_transient(), "Waiting list sweep failed");
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("Waiting list sweeper shutting down");
                        break;
                    }
                }
            }

            *running.write().await = false;
            info!("Waiting list sweeper stopped");
        })
    }

    /// Check if the sweeper is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}
