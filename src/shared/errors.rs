use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid stay window: check-in {check_in} must be before check-out {check_out}")]
    InvalidWindow {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Invalid guest count: {0} (at least one guest is required)")]
    InvalidGuestCount(i32),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if the caller retries it.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }

    /// Validation failures are raised before anything is persisted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidWindow { .. }
                | DomainError::InvalidGuestCount(_)
                | DomainError::InvalidDateRange { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metrics exporter error: {0}")]
    Metrics(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_transient() {
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(!DomainError::InvalidGuestCount(0).is_transient());
    }

    #[test]
    fn validation_classification() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(DomainError::InvalidWindow {
            check_in: d,
            check_out: d
        }
        .is_validation());
        assert!(DomainError::InvalidGuestCount(-1).is_validation());
        assert!(!DomainError::Conflict("dup".into()).is_validation());
    }

    #[test]
    fn display_mentions_offending_values() {
        let err = DomainError::InvalidGuestCount(0);
        assert_eq!(
            err.to_string(),
            "Invalid guest count: 0 (at least one guest is required)"
        );
    }
}
