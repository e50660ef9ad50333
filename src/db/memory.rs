use std::sync::{
    atomic::{AtomicBool, Ordering},
    RwLock,
};

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use futures_util::future::{self, BoxFuture, FutureExt};

use super::store::{AnnouncementStore, StoreError, StoreResult};
use crate::models::announcement::{Announcement, AnnouncementChanges, NewAnnouncement};

/// Process-local store keeping records in insertion order.
#[derive(Default)]
pub struct InMemoryAnnouncementStore {
    records: RwLock<Vec<Announcement>>,
    failing: AtomicBool,
}

impl InMemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `StoreError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: ObjectId) -> Option<Announcement> {
        self.read().iter().find(|a| a.id == id).cloned()
    }

    /// Inserts a record verbatim, bypassing the create path.
    pub fn seed(&self, announcement: Announcement) {
        self.write().push(announcement);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Announcement>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Announcement>> {
        self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run<T: Send + 'static>(&self, op: impl FnOnce() -> T) -> BoxFuture<'_, StoreResult<T>> {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store set to fail".into()))
        } else {
            Ok(op())
        };
        future::ready(result).boxed()
    }
}

impl AnnouncementStore for InMemoryAnnouncementStore {
    fn find_visible(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<Vec<Announcement>>> {
        self.run(|| {
            self.read()
                .iter()
                .filter(|a| a.is_visible_at(now))
                .cloned()
                .collect()
        })
    }

    fn insert(&self, new: NewAnnouncement) -> BoxFuture<'_, StoreResult<Announcement>> {
        self.run(|| {
            let announcement = Announcement {
                id: ObjectId::new(),
                message: new.message,
                expires_at: new.expires_at,
                starts_at: Some(new.starts_at),
                created_by: Some(new.created_by),
            };
            self.write().push(announcement.clone());
            announcement
        })
    }

    fn update(
        &self,
        id: ObjectId,
        changes: AnnouncementChanges,
    ) -> BoxFuture<'_, StoreResult<Option<Announcement>>> {
        self.run(|| {
            let mut records = self.write();
            let record = records.iter_mut().find(|a| a.id == id)?;
            changes.apply_to(record);
            Some(record.clone())
        })
    }

    fn delete(&self, id: ObjectId) -> BoxFuture<'_, StoreResult<bool>> {
        self.run(|| {
            let mut records = self.write();
            let before = records.len();
            records.retain(|a| a.id != id);
            records.len() != before
        })
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        self.run(|| {
            let mut records = self.write();
            let before = records.len();
            records.retain(|a| a.expires_at >= now);
            (before - records.len()) as u64
        })
    }

    fn count_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        self.run(|| self.read().iter().filter(|a| a.expires_at < now).count() as u64)
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        self.run(|| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn expiring_at(expires_at: DateTime<Utc>) -> Announcement {
        Announcement {
            id: ObjectId::new(),
            message: "m".into(),
            expires_at,
            starts_at: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn count_and_purge_agree_on_the_expiry_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let store = InMemoryAnnouncementStore::new();
        let before = expiring_at(now - Duration::seconds(1));
        let at_now = expiring_at(now);
        let after = expiring_at(now + Duration::seconds(1));
        for a in [&before, &at_now, &after] {
            store.seed(a.clone());
        }

        assert_eq!(store.count_expired(now).await.unwrap(), 1);
        assert_eq!(store.len(), 3);

        assert_eq!(store.delete_expired(now).await.unwrap(), 1);
        assert!(store.get(before.id).is_none());
        assert_eq!(store.get(at_now.id), Some(at_now));
        assert_eq!(store.get(after.id), Some(after));
        assert_eq!(store.count_expired(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failing_mode_fails_every_call() {
        let store = InMemoryAnnouncementStore::new();
        store.set_failing(true);
        let now = Utc::now();
        assert!(matches!(store.count_expired(now).await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.delete_expired(now).await, Err(StoreError::Unavailable(_))));
        assert!(store.ping().await.is_err());
    }
}
