//! Configuration module
//!
//! TOML configuration with per-section defaults. A missing file means
//! "run with defaults"; a malformed one is an error.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::{SweeperConfig, WaitingListConfig};
use crate::domain::ExpiryPolicy;
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::InfraError;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "HOTEL_BOOKING_CONFIG";

const CONFIG_HEADER: &str = "\
# Hotel booking conflict service configuration
#
# Every key is optional; omitted keys fall back to the values shown here.
# RUST_LOG, when set, takes precedence over [logging].level.

";

/// Default config location: `$HOTEL_BOOKING_CONFIG`, else
/// `~/.config/hotel-booking/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hotel-booking")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub waiting_list: WaitingListSection,
    pub sweeper: SweeperSection,
    pub logging: LoggingSection,
    pub metrics: MetricsSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitingListSection {
    /// Priority given to every new entry
    pub default_priority: i32,
    pub max_page_size: u32,
    /// Average stay length used for wait estimates
    pub avg_stay_days: u32,
}

impl Default for WaitingListSection {
    fn default() -> Self {
        let wl = WaitingListConfig::default();
        Self {
            default_priority: wl.default_priority,
            max_page_size: wl.max_page_size,
            avg_stay_days: wl.avg_stay_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweeperSection {
    pub enabled: bool,
    pub interval_secs: u64,
    pub batch_size: u64,
    /// Expire entries once their check-in day arrives
    pub expire_after_check_in: bool,
    /// Expire entries older than this many hours (0 = off)
    pub max_age_hours: u64,
}

impl Default for SweeperSection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            batch_size: crate::application::services::DEFAULT_BATCH_SIZE,
            expire_after_check_in: true,
            max_age_hours: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive, e.g. "info" or "hotel_booking=debug,sea_orm=warn"
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    pub enabled: bool,
    /// Prometheus scrape endpoint address
    pub listen: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "127.0.0.1:9464".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Seconds allowed for graceful shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            shutdown_timeout: 30,
        }
    }
}

impl AppConfig {
    /// Load from `path`; defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(self)?;
        fs::write(path, format!("{CONFIG_HEADER}{body}"))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.database.url.trim().is_empty() {
            return Err(InfraError::InvalidConfig("database.url is empty".into()));
        }
        if self.waiting_list.max_page_size == 0 {
            return Err(InfraError::InvalidConfig(
                "waiting_list.max_page_size must be at least 1".into(),
            ));
        }
        if self.sweeper.batch_size == 0 {
            return Err(InfraError::InvalidConfig(
                "sweeper.batch_size must be at least 1".into(),
            ));
        }
        if self.sweeper.interval_secs == 0 {
            return Err(InfraError::InvalidConfig(
                "sweeper.interval_secs must be at least 1".into(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(InfraError::InvalidConfig(format!(
                    "logging.format must be \"text\" or \"json\", got \"{other}\""
                )))
            }
        }
        if self.metrics.enabled {
            self.metrics_addr()?;
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn waiting_list_config(&self) -> WaitingListConfig {
        WaitingListConfig {
            default_priority: self.waiting_list.default_priority,
            max_page_size: self.waiting_list.max_page_size,
            avg_stay_days: self.waiting_list.avg_stay_days,
        }
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        // 0 or an out-of-range value disables the age rule
        let max_age = match self.sweeper.max_age_hours {
            0 => None,
            hours => i64::try_from(hours).ok().and_then(chrono::Duration::try_hours),
        };
        ExpiryPolicy {
            expire_after_check_in: self.sweeper.expire_after_check_in,
            max_age,
        }
    }

    pub fn sweeper_config(&self) -> SweeperConfig {
        SweeperConfig {
            interval: Duration::from_secs(self.sweeper.interval_secs),
            policy: self.expiry_policy(),
        }
    }

    pub fn metrics_addr(&self) -> Result<SocketAddr, InfraError> {
        self.metrics.listen.parse().map_err(|e| {
            InfraError::InvalidConfig(format!(
                "metrics.listen \"{}\" is not a socket address: {e}",
                self.metrics.listen
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hotel-booking-config-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(&temp_path("missing")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [waiting_list]
            default_priority = 5

            [sweeper]
            max_age_hours = 72
            "#,
        )
        .unwrap();

        assert_eq!(config.waiting_list.default_priority, 5);
        assert_eq!(config.waiting_list.max_page_size, 100);
        assert_eq!(config.database, DatabaseSection::default());

        let policy = config.expiry_policy();
        assert!(policy.expire_after_check_in);
        assert_eq!(policy.max_age, Some(chrono::Duration::hours(72)));
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let mut config = AppConfig::default();
        config.sweeper.batch_size = 50;
        config.logging.format = "json".into();

        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Hotel booking"));
        assert_eq!(AppConfig::load(&path).unwrap(), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn validation_rejects_zero_sizes() {
        let mut config = AppConfig::default();
        config.sweeper.batch_size = 0;
        assert!(matches!(config.validate(), Err(InfraError::InvalidConfig(_))));

        let mut config = AppConfig::default();
        config.sweeper.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.waiting_list.max_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn metrics_address_is_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.metrics.listen = "not-an-address".into();
        assert!(config.validate().is_ok());

        config.metrics.enabled = true;
        assert!(config.validate().is_err());
    }
}
