//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::{BookingStore, RoomDirectory};
use super::conflict::ConflictRepository;
use super::waiting_list::WaitingListRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let entry = repos.waiting_list().find_by_id(1).await?;
///     let clashes = repos.bookings().find_overlapping_bookings(100, &window).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn conflicts(&self) -> &dyn ConflictRepository;
    fn waiting_list(&self) -> &dyn WaitingListRepository;
    fn bookings(&self) -> &dyn BookingStore;
    fn rooms(&self) -> &dyn RoomDirectory;
}
