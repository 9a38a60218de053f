//! Shared fixtures for service tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Notify;

use crate::application::ports::{ManualClock, NotificationDispatcher, NotificationError};
use crate::domain::{BookingId, RepositoryProvider, StayWindow};
use crate::infrastructure::storage::InMemoryRepositoryProvider;

/// Notifier fake that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, i64, BookingId)>>,
    delivered: Notify,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            delivered: Notify::new(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(i64, i64, BookingId)> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until `count` calls were recorded, then give any further
    /// spawned notification tasks a turn before reporting what was recorded.
    pub async fn wait_for(&self, count: usize) -> Vec<(i64, i64, BookingId)> {
        let recorded = async {
            while self.sent().len() < count {
                self.delivered.notified().await;
            }
        };
        tokio::time::timeout(Duration::from_secs(1), recorded)
            .await
            .expect("notification not delivered");
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        self.sent()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify_waiting_list_confirmed(
        &self,
        user_id: i64,
        room_id: i64,
        booking_id: BookingId,
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push((user_id, room_id, booking_id));
        self.delivered.notify_one();
        if self.fail {
            return Err(NotificationError::Delivery("smtp unreachable".into()));
        }
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<InMemoryRepositoryProvider>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryRepositoryProvider::new()),
            clock: Arc::new(ManualClock::new(at("2025-01-05T09:00:00Z"))),
        }
    }

    pub fn repos(&self) -> Arc<dyn RepositoryProvider> {
        self.store.clone()
    }
}

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// January stay window
pub fn jan(from: u32, to: u32) -> StayWindow {
    StayWindow::new(day(from), day(to)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_for_wakes_on_late_delivery() {
        let notifier = Arc::new(RecordingNotifier::default());
        let sender = notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            sender.notify_waiting_list_confirmed(7, 100, 400).await
        });

        assert_eq!(notifier.wait_for(1).await, vec![(7, 100, 400)]);
    }

    #[tokio::test]
    async fn wait_for_zero_still_runs_queued_sends() {
        let notifier = Arc::new(RecordingNotifier::default());
        let sender = notifier.clone();
        tokio::spawn(async move { sender.notify_waiting_list_confirmed(7, 100, 400).await });

        assert_eq!(notifier.wait_for(0).await.len(), 1);
    }
}
