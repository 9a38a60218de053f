//! Expiry of stale waiting entries

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{DomainResult, ExpiryPolicy, RepositoryProvider};
use crate::shared::metrics::WAITING_LIST_EXPIRED_TOTAL;

pub const DEFAULT_BATCH_SIZE: u64 = 500;

pub struct ExpirationSweeper {
    repos: Arc<dyn RepositoryProvider>,
    batch_size: u64,
}

impl ExpirationSweeper {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Expire every waiting entry the policy marks stale at `now`.
    ///
    /// Works in batches that each commit on their own, so an interrupted
    /// sweep leaves only whole batches behind and the next run picks up the
    /// rest. Returns how many entries were expired.
    pub async fn sweep(&self, now: DateTime<Utc>, policy: &ExpiryPolicy) -> DomainResult<u64> {
        let criteria = policy.criteria(now);
        if criteria.is_empty() {
            debug!("Expiry policy has no rules enabled; nothing to sweep");
            return Ok(0);
        }

        let repo = self.repos.waiting_list();
        let mut expired = 0u64;
        let mut batches = 0u32;

        loop {
            let batch = repo.find_expired(&criteria, self.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            let ids: Vec<i64> = batch.iter().map(|e| e.id).collect();
            let moved = repo.mark_expired(&ids).await?;
            expired += moved;
            batches += 1;
            debug!(batch = batches, selected = ids.len(), expired = moved, "Expiry batch committed");

            if (ids.len() as u64) < self.batch_size {
                break;
            }
        }

        if expired > 0 {
            metrics::counter!(WAITING_LIST_EXPIRED_TOTAL).increment(expired);
            info!(expired, batches, "Expired stale waiting list entries");
        }
        Ok(expired)
    }
}
