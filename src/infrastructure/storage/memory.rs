//! In-memory storage implementation
//!
//! Mirrors the SeaORM provider's guarantees with `DashMap` shard locks: the
//! `(room, user)` waiting index plays the part of the partial unique index,
//! and status transitions happen under the entry's write guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::booking::{BookingId, BookingStore, RoomDirectory};
use crate::domain::conflict::{
    ConflictRecord, ConflictRepository, ConflictStatus, NewConflictRecord, RoomConflictCount,
};
use crate::domain::waiting_list::{
    queue_order, ExpiryCriteria, NewWaitingEntry, WaitingEntry, WaitingListRepository,
    WaitingStatus,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, StayWindow};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

// ── Bookings & rooms ────────────────────────────────────────────

#[derive(Debug, Clone)]
struct StoredBooking {
    room_id: i64,
    window: StayWindow,
    confirmed: bool,
}

/// Booking store for development and testing
#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: DashMap<BookingId, StoredBooking>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_confirmed(&self, booking_id: BookingId, room_id: i64, window: StayWindow) {
        self.bookings.insert(
            booking_id,
            StoredBooking {
                room_id,
                window,
                confirmed: true,
            },
        );
    }

    /// Returns false if the booking is unknown
    pub fn cancel(&self, booking_id: BookingId) -> bool {
        match self.bookings.get_mut(&booking_id) {
            Some(mut b) => {
                b.confirmed = false;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_overlapping_bookings(
        &self,
        room_id: i64,
        window: &StayWindow,
    ) -> DomainResult<Vec<BookingId>> {
        let mut ids: Vec<BookingId> = self
            .bookings
            .iter()
            .filter(|b| b.confirmed && b.room_id == room_id && b.window.overlaps(window))
            .map(|b| *b.key())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

/// Room directory for development and testing
#[derive(Default)]
pub struct InMemoryRoomDirectory {
    rooms: DashMap<i64, String>,
}

impl InMemoryRoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&self, room_id: i64, room_number: impl Into<String>) {
        self.rooms.insert(room_id, room_number.into());
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn room_number(&self, room_id: i64) -> DomainResult<Option<String>> {
        Ok(self.rooms.get(&room_id).map(|n| n.clone()))
    }
}

// ── Conflicts ───────────────────────────────────────────────────

pub struct InMemoryConflictRepository {
    records: DashMap<i64, ConflictRecord>,
    counter: AtomicI64,
}

impl InMemoryConflictRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }

    /// Stand-in for the external workflow that resolves conflicts.
    pub fn mark_resolved(&self, id: i64) -> bool {
        match self.records.get_mut(&id) {
            Some(mut r) => {
                r.status = ConflictStatus::Resolved;
                true
            }
            None => false,
        }
    }

    fn in_window<'a>(
        &'a self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> impl Iterator<Item = ConflictRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| {
                from <= r.detected_at
                    && r.detected_at < until
                    && room_id.map_or(true, |room| r.room_id == room)
            })
            .map(|r| r.value().clone())
    }
}

impl Default for InMemoryConflictRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConflictRepository for InMemoryConflictRepository {
    async fn save(&self, record: NewConflictRecord) -> DomainResult<ConflictRecord> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let record = record.into_record(id);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ConflictRecord>> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }

    async fn count_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
        status: Option<ConflictStatus>,
    ) -> DomainResult<u64> {
        Ok(self
            .in_window(from, until, room_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .count() as u64)
    }

    async fn most_conflicted_room(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<Option<RoomConflictCount>> {
        let mut per_room: HashMap<i64, u64> = HashMap::new();
        for record in self.in_window(from, until, room_id) {
            *per_room.entry(record.room_id).or_default() += 1;
        }
        Ok(per_room
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(room_id, conflicts)| RoomConflictCount { room_id, conflicts }))
    }
}

// ── Waiting list ────────────────────────────────────────────────

pub struct InMemoryWaitingListRepository {
    entries: DashMap<i64, WaitingEntry>,
    /// (room, user) -> id of the single `Waiting` entry for that pair
    waiting_index: DashMap<(i64, i64), i64>,
    counter: AtomicI64,
}

impl InMemoryWaitingListRepository {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            waiting_index: DashMap::new(),
            counter: AtomicI64::new(1),
        }
    }

    /// Apply a terminal transition under the entry's write guard, then drop
    /// the pair from the waiting index. The guard is released before the
    /// index is touched; `save` locks in the opposite order and treats an
    /// index slot pointing at a terminal entry as free.
    fn transition(
        &self,
        id: i64,
        apply: impl FnOnce(&WaitingEntry) -> Option<WaitingEntry>,
    ) -> bool {
        let key = {
            let Some(mut slot) = self.entries.get_mut(&id) else {
                return false;
            };
            let Some(next) = apply(slot.value()) else {
                return false;
            };
            let key = (next.room_id, next.user_id);
            *slot = next;
            key
        };
        self.waiting_index.remove_if(&key, |_, waiting_id| *waiting_id == id);
        true
    }

    fn insert_entry(&self, entry: NewWaitingEntry) -> WaitingEntry {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let entry = entry.into_entry(id);
        self.entries.insert(id, entry.clone());
        entry
    }

    fn sorted_by_queue(&self, filter: impl Fn(&WaitingEntry) -> bool) -> Vec<WaitingEntry> {
        let mut out: Vec<WaitingEntry> = self
            .entries
            .iter()
            .filter(|e| filter(e.value()))
            .map(|e| e.value().clone())
            .collect();
        out.sort_by(queue_order);
        out
    }
}

impl Default for InMemoryWaitingListRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WaitingListRepository for InMemoryWaitingListRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WaitingEntry>> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
        status: WaitingStatus,
    ) -> DomainResult<Option<WaitingEntry>> {
        if status == WaitingStatus::Waiting {
            let Some(id) = self.waiting_index.get(&(room_id, user_id)).map(|id| *id) else {
                return Ok(None);
            };
            return Ok(self
                .entries
                .get(&id)
                .filter(|e| e.is_waiting())
                .map(|e| e.clone()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| e.room_id == room_id && e.user_id == user_id && e.status == status)
            .map(|e| e.value().clone())
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))))
    }

    async fn save(&self, entry: NewWaitingEntry) -> DomainResult<WaitingEntry> {
        match self.waiting_index.entry((entry.room_id, entry.user_id)) {
            Entry::Occupied(mut slot) => {
                let held = *slot.get();
                let still_waiting = self.entries.get(&held).is_some_and(|e| e.is_waiting());
                if still_waiting {
                    return Err(DomainError::Conflict(format!(
                        "waiting entry {} already queued for room {} user {}",
                        held, entry.room_id, entry.user_id
                    )));
                }
                // transition finished but has not released the slot yet
                let entry = self.insert_entry(entry);
                slot.insert(entry.id);
                Ok(entry)
            }
            Entry::Vacant(slot) => {
                let entry = self.insert_entry(entry);
                slot.insert(entry.id);
                Ok(entry)
            }
        }
    }

    async fn mark_confirmed(&self, id: i64, booking_id: i64) -> DomainResult<bool> {
        Ok(self.transition(id, |e| e.confirmed(booking_id)))
    }

    async fn mark_expired(&self, ids: &[i64]) -> DomainResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.transition(**id, WaitingEntry::expired))
            .count() as u64)
    }

    async fn find_expired(
        &self,
        criteria: &ExpiryCriteria,
        limit: u64,
    ) -> DomainResult<Vec<WaitingEntry>> {
        if criteria.is_empty() {
            return Ok(Vec::new());
        }
        let mut stale: Vec<WaitingEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_waiting() && criteria.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        stale.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        stale.truncate(limit as usize);
        Ok(stale)
    }

    async fn find_waiting_for_room(&self, room_id: i64) -> DomainResult<Vec<WaitingEntry>> {
        Ok(self.sorted_by_queue(|e| e.room_id == room_id && e.is_waiting()))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        status: Option<WaitingStatus>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<WaitingEntry>> {
        let all = self.sorted_by_queue(|e| {
            e.user_id == user_id && status.map_or(true, |s| e.status == s)
        });
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<u64> {
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                from <= e.created_at
                    && e.created_at < until
                    && room_id.map_or(true, |room| e.room_id == room)
            })
            .count() as u64)
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory repository provider for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    conflicts: InMemoryConflictRepository,
    waiting_list: InMemoryWaitingListRepository,
    bookings: InMemoryBookingStore,
    rooms: InMemoryRoomDirectory,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_store(&self) -> &InMemoryBookingStore {
        &self.bookings
    }

    pub fn room_directory(&self) -> &InMemoryRoomDirectory {
        &self.rooms
    }

    pub fn conflict_store(&self) -> &InMemoryConflictRepository {
        &self.conflicts
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn conflicts(&self) -> &dyn ConflictRepository {
        &self.conflicts
    }

    fn waiting_list(&self) -> &dyn WaitingListRepository {
        &self.waiting_list
    }

    fn bookings(&self) -> &dyn BookingStore {
        &self.bookings
    }

    fn rooms(&self) -> &dyn RoomDirectory {
        &self.rooms
    }
}
