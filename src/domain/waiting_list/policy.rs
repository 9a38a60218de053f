//! Expiry policy for stale waiting entries

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::model::WaitingEntry;

/// Which waiting entries a sweep considers stale.
///
/// An entry is stale when *any* enabled rule matches. With every rule off,
/// nothing expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Expire entries whose requested check-in day has passed. The check-in
    /// day itself still counts as fillable.
    pub expire_after_check_in: bool,
    /// Expire entries that have been waiting at least this long
    pub max_age: Option<Duration>,
}

impl ExpiryPolicy {
    pub fn check_in_passed() -> Self {
        Self {
            expire_after_check_in: true,
            max_age: None,
        }
    }

    pub fn older_than(max_age: Duration) -> Self {
        Self {
            expire_after_check_in: false,
            max_age: Some(max_age),
        }
    }

    /// Resolve the policy against a point in time.
    pub fn criteria(&self, now: DateTime<Utc>) -> ExpiryCriteria {
        ExpiryCriteria {
            check_in_before: self.expire_after_check_in.then(|| now.date_naive()),
            created_on_or_before: self.max_age.map(|age| now - age),
        }
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::check_in_passed()
    }
}

/// Concrete cutoffs a repository can turn into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryCriteria {
    /// Stale when `check_in` is strictly earlier than this day
    pub check_in_before: Option<NaiveDate>,
    pub created_on_or_before: Option<DateTime<Utc>>,
}

impl ExpiryCriteria {
    pub fn is_empty(&self) -> bool {
        self.check_in_before.is_none() && self.created_on_or_before.is_none()
    }

    /// Status is not checked here; only `Waiting` entries are ever eligible.
    pub fn matches(&self, entry: &WaitingEntry) -> bool {
        let past_check_in = self
            .check_in_before
            .is_some_and(|cutoff| entry.window.check_in() < cutoff);
        let too_old = self
            .created_on_or_before
            .is_some_and(|cutoff| entry.created_at <= cutoff);
        past_check_in || too_old
    }
}
