//! Conflict record domain entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, StayWindow};

/// Why a request conflicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictType {
    /// The requested stay overlaps a confirmed booking for the same room
    TimeOverlap,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeOverlap => "TimeOverlap",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "TimeOverlap" => Ok(Self::TimeOverlap),
            other => Err(DomainError::Corrupted(format!("unknown conflict type '{other}'"))),
        }
    }
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictStatus {
    /// Recorded by the detector
    Detected,
    /// Marked resolved by an external workflow; only read by reporting
    Resolved,
}

impl ConflictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detected => "Detected",
            Self::Resolved => "Resolved",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Detected" => Ok(Self::Detected),
            "Resolved" => Ok(Self::Resolved),
            other => Err(DomainError::Corrupted(format!("unknown conflict status '{other}'"))),
        }
    }
}

impl std::fmt::Display for ConflictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRecord {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub window: StayWindow,
    pub conflict_type: ConflictType,
    pub status: ConflictStatus,
    pub detected_at: DateTime<Utc>,
}

/// A conflict about to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConflictRecord {
    pub room_id: i64,
    pub user_id: i64,
    pub window: StayWindow,
    pub conflict_type: ConflictType,
    pub detected_at: DateTime<Utc>,
}

impl NewConflictRecord {
    pub fn time_overlap(
        room_id: i64,
        user_id: i64,
        window: StayWindow,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id,
            user_id,
            window,
            conflict_type: ConflictType::TimeOverlap,
            detected_at,
        }
    }

    /// Every new record starts as `Detected`.
    pub fn into_record(self, id: i64) -> ConflictRecord {
        ConflictRecord {
            id,
            room_id: self.room_id,
            user_id: self.user_id,
            window: self.window,
            conflict_type: self.conflict_type,
            status: ConflictStatus::Detected,
            detected_at: self.detected_at,
        }
    }
}
