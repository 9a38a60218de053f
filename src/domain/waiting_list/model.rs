//! Waiting entry domain entity

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, StayWindow};

/// Waiting entry status. `Waiting` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WaitingStatus {
    /// Queued for the room
    Waiting,
    /// Promoted to a booking
    Confirmed,
    /// Demoted by a sweep
    Expired,
}

impl WaitingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Confirmed => "Confirmed",
            Self::Expired => "Expired",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Waiting" => Ok(Self::Waiting),
            "Confirmed" => Ok(Self::Confirmed),
            "Expired" => Ok(Self::Expired),
            other => Err(DomainError::Corrupted(format!("unknown waiting status '{other}'"))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Waiting => false,
            Self::Confirmed | Self::Expired => true,
        }
    }

    /// Only `Waiting -> Confirmed` and `Waiting -> Expired` are allowed.
    pub fn can_transition_to(&self, next: WaitingStatus) -> bool {
        match (self, next) {
            (Self::Waiting, Self::Confirmed) | (Self::Waiting, Self::Expired) => true,
            (Self::Waiting, Self::Waiting) => false,
            (Self::Confirmed, _) | (Self::Expired, _) => false,
        }
    }
}

impl std::fmt::Display for WaitingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queued request for a room that was unavailable for the desired stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingEntry {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub window: StayWindow,
    pub guest_count: i32,
    /// Higher is served first
    pub priority: i32,
    pub status: WaitingStatus,
    /// Set only once the entry is `Confirmed`
    pub confirmed_booking_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl WaitingEntry {
    pub fn is_waiting(&self) -> bool {
        self.status == WaitingStatus::Waiting
    }

    /// Confirmed copy of this entry, or `None` if the entry is terminal.
    pub fn confirmed(&self, booking_id: i64) -> Option<WaitingEntry> {
        if !self.status.can_transition_to(WaitingStatus::Confirmed) {
            return None;
        }
        Some(WaitingEntry {
            status: WaitingStatus::Confirmed,
            confirmed_booking_id: Some(booking_id),
            ..self.clone()
        })
    }

    /// Expired copy of this entry, or `None` if the entry is terminal.
    pub fn expired(&self) -> Option<WaitingEntry> {
        if !self.status.can_transition_to(WaitingStatus::Expired) {
            return None;
        }
        Some(WaitingEntry {
            status: WaitingStatus::Expired,
            ..self.clone()
        })
    }
}

/// Queue order: priority descending, then created_at ascending, then id.
pub fn queue_order(a: &WaitingEntry, b: &WaitingEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// A waiting entry about to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitingEntry {
    pub room_id: i64,
    pub user_id: i64,
    pub window: StayWindow,
    pub guest_count: i32,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

impl NewWaitingEntry {
    pub fn into_entry(self, id: i64) -> WaitingEntry {
        WaitingEntry {
            id,
            room_id: self.room_id,
            user_id: self.user_id,
            window: self.window,
            guest_count: self.guest_count,
            priority: self.priority,
            status: WaitingStatus::Waiting,
            confirmed_booking_id: None,
            created_at: self.created_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn sample_entry(id: i64, priority: i32, created_offset_secs: i64) -> WaitingEntry {
        let base = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        NewWaitingEntry {
            room_id: 100,
            user_id: id,
            window: StayWindow::new(
                NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 22).unwrap(),
            )
            .unwrap(),
            guest_count: 2,
            priority,
            created_at: base + Duration::seconds(created_offset_secs),
        }
        .into_entry(id)
    }

    #[test]
    fn new_entry_is_waiting() {
        let e = sample_entry(1, 0, 0);
        assert!(e.is_waiting());
        assert_eq!(e.confirmed_booking_id, None);
    }

    #[test]
    fn confirm_sets_booking_id() {
        let e = sample_entry(1, 0, 0).confirmed(400).unwrap();
        assert_eq!(e.status, WaitingStatus::Confirmed);
        assert_eq!(e.confirmed_booking_id, Some(400));
    }

    #[test]
    fn terminal_states_do_not_transition() {
        let confirmed = sample_entry(1, 0, 0).confirmed(400).unwrap();
        assert!(confirmed.expired().is_none());
        assert!(confirmed.confirmed(401).is_none());

        let expired = sample_entry(2, 0, 0).expired().unwrap();
        assert!(expired.confirmed(400).is_none());
        assert!(expired.expired().is_none());
    }

    #[test]
    fn transition_table() {
        use WaitingStatus::*;
        assert!(Waiting.can_transition_to(Confirmed));
        assert!(Waiting.can_transition_to(Expired));
        assert!(!Waiting.can_transition_to(Waiting));
        for terminal in [Confirmed, Expired] {
            assert!(terminal.is_terminal());
            for next in [Waiting, Confirmed, Expired] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn ordering_is_priority_then_fifo() {
        let mut entries = vec![
            sample_entry(1, 0, 30),
            sample_entry(2, 5, 60),
            sample_entry(3, 0, 10),
            sample_entry(4, 5, 0),
        ];
        entries.sort_by(queue_order);
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let mut entries = vec![sample_entry(9, 0, 0), sample_entry(3, 0, 0)];
        entries.sort_by(queue_order);
        assert_eq!(entries[0].id, 3);
    }

    #[test]
    fn status_parse_rejects_unknown() {
        for status in [WaitingStatus::Waiting, WaitingStatus::Confirmed, WaitingStatus::Expired] {
            assert_eq!(WaitingStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(WaitingStatus::parse("Cancelled").is_err());
    }
}
