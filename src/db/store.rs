use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;

use crate::models::announcement::{Announcement, AnnouncementChanges, NewAnnouncement};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for the announcements collection.
///
/// Each call is a single-document (or single-filter) operation; there is no
/// cross-call transaction and concurrent writers race with last-writer-wins.
pub trait AnnouncementStore: Send + Sync {
    /// Records whose visibility window contains `now`, in store-native order.
    fn find_visible(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<Vec<Announcement>>>;

    fn insert(&self, new: NewAnnouncement) -> BoxFuture<'_, StoreResult<Announcement>>;

    /// Applies the present fields and returns the re-fetched record,
    /// or `None` when no record has this id.
    fn update(
        &self,
        id: ObjectId,
        changes: AnnouncementChanges,
    ) -> BoxFuture<'_, StoreResult<Option<Announcement>>>;

    /// Returns whether a record was removed.
    fn delete(&self, id: ObjectId) -> BoxFuture<'_, StoreResult<bool>>;

    /// Removes every record with `expires_at < now`, returning how many.
    fn delete_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>>;

    /// Counts records with `expires_at < now`.
    fn count_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>>;

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>>;
}
